//! Status command - one-shot fetch of both status endpoints.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use crate::output::{print_single, OutputFormat};

use super::CommandContext;

/// Status command.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Scheduler name.
    name: String,
}

impl StatusCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;

        // The two endpoints are independent; neither snapshot is merged into
        // the other.
        let scheduler = client.scheduler_data(&self.name).await?;
        let daemon = client.daemon_status(&self.name).await?;

        if let OutputFormat::Json = ctx.format {
            print_single(&json!({ "scheduler": scheduler, "daemon": daemon }), ctx.format);
            return Ok(());
        }

        let state = if daemon.running {
            "running".green().bold()
        } else {
            "stopped".red().bold()
        };

        println!("{}  {}", scheduler.name.bold(), state);
        println!("  pk:         {}", scheduler.pk);
        if let Some(ctime) = &scheduler.ctime {
            println!("  created:    {}", ctime);
        }
        if let Some(pid) = daemon.pid {
            println!("  pid:        {}", pid);
        }
        if let Some(start_time) = &daemon.start_time {
            println!("  started:    {}", start_time);
        }
        println!(
            "  processes:  {}/{} running, {} waiting",
            scheduler.running_process_count, scheduler.max_processes,
            scheduler.waiting_process_count
        );
        println!(
            "  calcjobs:   {}/{}",
            scheduler.running_calcjob_count, scheduler.max_calcjobs
        );
        println!(
            "  workflows:  {}/{}",
            scheduler.running_workflow_count, scheduler.max_workflows
        );
        if let Some(cpu) = daemon.cpu {
            println!("  cpu:        {:.1}%", cpu);
        }
        if let Some(memory) = daemon.memory {
            println!("  memory:     {:.0}", memory);
        }

        Ok(())
    }
}
