//! Start command.

use anyhow::Result;
use clap::Args;

use schedmon_types::SchedulerControl;

use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Start command.
#[derive(Debug, Args)]
pub struct StartCommand {
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

impl StartCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let control = SchedulerControl {
            name: self.name,
            max_calcjobs: self.max_calcjobs,
            max_workflows: self.max_workflows,
            max_processes: self.max_processes,
            foreground: false,
        };

        let scheduler = ctx.dispatcher()?.start(&control).await?;

        if let OutputFormat::Json = ctx.format {
            print_single(&scheduler, ctx.format);
        }

        Ok(())
    }
}
