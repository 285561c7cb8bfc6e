//! Set-limit command - update one concurrency limit.

use anyhow::Result;
use clap::Args;

use schedmon_types::LimitKind;

use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Set-limit command.
#[derive(Debug, Args)]
pub struct SetLimitCommand {
    /// Scheduler name.
    name: String,

    /// Which limit to set: processes, calcjobs, or workflows.
    kind: LimitKind,

    /// New value (base-10 integer).
    value: String,
}

impl SetLimitCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let scheduler = ctx
            .dispatcher()?
            .set_limit(&self.name, self.kind, &self.value)
            .await?;

        if let OutputFormat::Json = ctx.format {
            print_single(&scheduler, ctx.format);
        }

        Ok(())
    }
}
