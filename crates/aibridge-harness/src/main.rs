use aibridge_harness::cli::{Cli, Commands};
use aibridge_harness::server::run_server;
use aibridge_harness::{commands, HarnessConfig, HarnessState};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = HarnessConfig::load(&cli.config)?.with_overrides(&cli.overrides);

    match cli.command {
        Commands::Resolve { urls } => {
            let state = HarnessState::new(config)?;
            commands::resolve(&state, urls).await?;
        }

        Commands::Replay { file } => {
            let state = HarnessState::new(config)?;
            commands::replay(&state, &file)?;
        }

        Commands::Serve { port, address } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(address) = address {
                config.listen = address;
            }
            let addr = config.socket_addr()?;

            println!();
            println!("  aibridge harness");
            println!();
            println!("  Variant: {}", config.variant);
            println!("  Assets:  {}", config.assets_dir.display());
            println!("  Model:   {}", config.model_path.as_deref().unwrap_or("(unset)"));
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            let state = HarnessState::new(config)?;
            run_server(state, addr).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "aibridge=debug,aibridge_core=debug,aibridge_resources=debug,aibridge_bridge=debug,aibridge_harness=debug,tower_http=debug"
    } else {
        "aibridge=info,aibridge_core=info,aibridge_resources=info,aibridge_bridge=info,aibridge_harness=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
