//! aibridge Harness
//!
//! Headless host for AI components: resolves scheme URLs, replays recorded
//! bridge messages, and serves the bootstrap page, scheme handler and event
//! stream over HTTP for browser-based development.

pub mod cli;
pub mod commands;
pub mod config;
pub mod host;
pub mod server;
pub mod state;

pub use config::HarnessConfig;
pub use state::HarnessState;
