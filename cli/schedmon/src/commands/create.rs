//! Create command - register a scheduler without starting it.

use anyhow::Result;
use clap::Args;

use schedmon_types::SchedulerControl;

use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Create command.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Scheduler name.
    name: String,

    /// Maximum concurrent processes.
    #[arg(long)]
    max_processes: Option<u32>,

    /// Maximum concurrent calcjobs.
    #[arg(long)]
    max_calcjobs: Option<u32>,

    /// Maximum concurrent workflows.
    #[arg(long)]
    max_workflows: Option<u32>,
}

impl CreateCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let control = SchedulerControl {
            name: self.name,
            max_calcjobs: self.max_calcjobs,
            max_workflows: self.max_workflows,
            max_processes: self.max_processes,
            foreground: false,
        };

        let scheduler = ctx.dispatcher()?.create(&control).await?;

        if let OutputFormat::Json = ctx.format {
            print_single(&scheduler, ctx.format);
        }

        Ok(())
    }
}
