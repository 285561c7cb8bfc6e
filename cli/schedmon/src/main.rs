//! schedmon - monitoring-and-control CLI for a job-scheduling subsystem.
//!
//! Talks to the scheduler control API over HTTP. The live-state engine
//! (polling, sliding-window metrics, edit guards) lives in `schedmon-sync`;
//! this binary wires it to a terminal front end.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use schedmon::commands::Cli;
use schedmon::config::{self, Config};
use schedmon::error::print_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Install the subscriber before loading the rest of the configuration,
    // so fallback warnings from the config loader are not lost. Logs go to
    // stderr so stdout stays machine-parseable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::log_filter())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    if let Err(e) = cli.run(config).await {
        print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
