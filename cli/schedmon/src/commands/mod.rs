//! CLI commands.

mod create;
mod delete;
mod limits;
mod list;
mod start;
mod status;
mod stop;
mod watch;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::ApiClient;
use crate::config::Config;
use crate::dispatch::ActionDispatcher;
use crate::output::OutputFormat;

/// schedmon - monitor and control job schedulers.
#[derive(Debug, Parser)]
#[command(name = "schedmon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all schedulers.
    List(list::ListCommand),

    /// Show a scheduler's summary and daemon status.
    Status(status::StatusCommand),

    /// Start a scheduler daemon.
    Start(start::StartCommand),

    /// Stop a running scheduler.
    Stop(stop::StopCommand),

    /// Delete a stopped scheduler.
    Delete(delete::DeleteCommand),

    /// Register a new scheduler without starting it.
    Create(create::CreateCommand),

    /// Update one of a scheduler's concurrency limits.
    SetLimit(limits::SetLimitCommand),

    /// Live-monitor a scheduler, polling both status endpoints.
    Watch(watch::WatchCommand),
}

impl Cli {
    pub async fn run(self, config: Config) -> Result<()> {
        let ctx = CommandContext {
            format: self.format.parse()?,
            config,
        };

        match self.command {
            Commands::List(cmd) => cmd.run(ctx).await,
            Commands::Status(cmd) => cmd.run(ctx).await,
            Commands::Start(cmd) => cmd.run(ctx).await,
            Commands::Stop(cmd) => cmd.run(ctx).await,
            Commands::Delete(cmd) => cmd.run(ctx).await,
            Commands::Create(cmd) => cmd.run(ctx).await,
            Commands::SetLimit(cmd) => cmd.run(ctx).await,
            Commands::Watch(cmd) => cmd.run(ctx).await,
        }
    }
}

/// Shared state passed to every command.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Build the API client.
    pub fn client(&self) -> Result<Arc<ApiClient>> {
        Ok(Arc::new(ApiClient::new(&self.config)?))
    }

    /// Build an action dispatcher without a poll loop (one-shot commands).
    pub fn dispatcher(&self) -> Result<ActionDispatcher> {
        Ok(ActionDispatcher::new(self.client()?))
    }
}
