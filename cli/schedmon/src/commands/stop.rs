//! Stop command.

use anyhow::Result;
use clap::Args;

use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Stop command.
#[derive(Debug, Args)]
pub struct StopCommand {
    /// Scheduler name.
    name: String,
}

impl StopCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let scheduler = ctx.dispatcher()?.stop(&self.name).await?;

        if let OutputFormat::Json = ctx.format {
            print_single(&scheduler, ctx.format);
        }

        Ok(())
    }
}
