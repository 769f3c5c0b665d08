//! Draftdesk - draft AI replies to citizen requests from the terminal.
//!
//! The assistant backend generates replies; this client keeps track of the
//! drafting lifecycle for the request at hand: up to five drafts, one of
//! which is finally selected and copied.
//!
//! Architecture:
//! - `drafting` holds the session state machine and the controller
//! - `api` talks to the backend over HTTP
//! - the CLI restores the session from a local cache on every invocation

mod api;
mod cache;
mod cli;
mod clipboard;
mod config;
mod drafting;
mod models;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("draftdesk=warn")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();
    execute(cli).await
}
