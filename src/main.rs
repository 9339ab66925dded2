//! skola-tui - terminal client for the Škola Online school service.
//!
//! Logs in with the OAuth2 password grant and shows grades, schedule,
//! messages, homework and behavior records in a tabbed table dashboard.

mod app;
mod config;
mod models;
mod screens;
mod services;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// skola-tui - Škola Online terminal client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to ./debug.log
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ~/.config/skola-tui/config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal belongs to the TUI, so debug logging goes to a file;
    // without --debug nothing is logged at all.
    if args.debug {
        let log_file = std::fs::File::create("debug.log")?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "skola_tui=debug,info".into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file)),
            )
            .init();
    }

    // Load configuration
    let config = if let Some(path) = args.config {
        config::Config::from_file(&path)?
    } else {
        config::Config::load()?
    };

    // Run the TUI application
    let mut app = app::App::new(config);
    app.run().await
}
