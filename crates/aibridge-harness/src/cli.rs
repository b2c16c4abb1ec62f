use aibridge_core::Variant;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aibridge")]
#[command(
    author,
    version,
    about = "Headless host for aibridge AI components"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Configuration file (yaml, toml or json)
    #[arg(short, long, global = true, env = "AIBRIDGE_CONFIG", default_value = "aibridge")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings given on the command line win over file and environment
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Component variant (e.g. personal-image-classifier)
    #[arg(long, global = true, value_parser = parse_variant)]
    pub variant: Option<Variant>,

    /// Directory holding bundled resources and model archives
    #[arg(long, global = true)]
    pub assets_dir: Option<PathBuf>,

    /// Model path, must end in .mdl
    #[arg(short, long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve scheme URLs and print what would be served
    Resolve {
        /// URLs such as appinventor:personal-image-classifier/personal/model.json
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Feed newline-delimited JSON messages through the bridge
    Replay {
        /// Message file, one {functionCall, args} object per line
        file: PathBuf,
    },

    /// Start the development server
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address
        #[arg(short, long)]
        address: Option<String>,
    },
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    s.parse()
}
