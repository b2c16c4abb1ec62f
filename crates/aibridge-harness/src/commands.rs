//! One-shot subcommands

use crate::host::{fetch, Delivery};
use crate::state::HarnessState;
use anyhow::Context;
use std::path::Path;
use tokio::sync::broadcast::error::TryRecvError;

/// Resolve every URL concurrently and print what each delivered
pub async fn resolve(state: &HarnessState, urls: Vec<String>) -> anyhow::Result<()> {
    let handles = urls.into_iter().map(|url| {
        let component = state.component.clone();
        tokio::task::spawn_blocking(move || {
            let delivery = fetch(&url, |request| component.start_resource_request(request));
            (url, delivery)
        })
    });

    let mut failed = 0usize;
    let results = futures::future::join_all(handles).await;
    let total = results.len();
    for result in results {
        let (url, delivery) = result.context("resolution task panicked")?;
        match delivery {
            Delivery::Served { response, .. } => {
                println!("ok    {:>10} bytes  {}", response.expected_content_length, url);
            }
            Delivery::Failed(message) => {
                failed += 1;
                println!("fail  {}: {}", url, message);
            }
            Delivery::Dropped => {
                failed += 1;
                println!("drop  {}", url);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} urls could not be resolved", failed, total);
    }
    Ok(())
}

/// Replay newline-delimited messages, printing emitted events as JSON lines
pub fn replay(state: &HarnessState, file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut events = state.component.subscribe();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        state.component.handle_message_str(line);
        loop {
            match events.try_recv() {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "replay fell behind the event bus");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    let snapshot = state.component.metrics().snapshot();
    tracing::info!(
        dispatched = snapshot.messages_dispatched,
        rejected = snapshot.messages_rejected,
        ignored = snapshot.messages_ignored,
        "replay finished"
    );
    Ok(())
}
