//! Delete command, with an explicit confirmation step.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CommandContext;

/// Delete command.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Scheduler name.
    name: String,

    /// Skip the interactive confirmation prompt.
    #[arg(long)]
    yes: bool,
}

impl DeleteCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let confirmed = self.yes || confirm(&format!("Delete scheduler '{}'?", self.name))?;

        // Without confirmation the dispatcher issues no request at all.
        ctx.dispatcher()?.delete(&self.name, confirmed).await?;
        Ok(())
    }
}

/// Ask a yes/no question on the terminal; defaults to no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} {} ", prompt.yellow(), "[y/N]".dimmed());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
