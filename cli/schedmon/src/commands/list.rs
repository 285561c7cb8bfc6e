//! List command - all schedulers with their counters and limits.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use schedmon_types::Scheduler;

use crate::output::{print_output, print_single, OutputFormat};

use super::CommandContext;

/// List command.
#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;
        let schedulers = client.list().await?;

        match ctx.format {
            OutputFormat::Json => print_single(&schedulers, ctx.format),
            OutputFormat::Table => {
                let rows: Vec<SchedulerRow> = schedulers.iter().map(SchedulerRow::from).collect();
                print_output(&rows, ctx.format);
            }
        }

        Ok(())
    }
}

/// One table row per scheduler.
#[derive(Debug, Serialize, Tabled)]
struct SchedulerRow {
    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "PK")]
    pk: i64,

    #[tabled(rename = "RUNNING")]
    running: String,

    #[tabled(rename = "WAITING")]
    waiting: u32,

    #[tabled(rename = "PROCESSES")]
    processes: String,

    #[tabled(rename = "CALCJOBS")]
    calcjobs: String,

    #[tabled(rename = "WORKFLOWS")]
    workflows: String,

    #[tabled(rename = "CREATED")]
    created: String,
}

impl From<&Scheduler> for SchedulerRow {
    fn from(s: &Scheduler) -> Self {
        let running = match s.running {
            Some(true) => "yes".to_string(),
            Some(false) => "no".to_string(),
            None => "-".to_string(),
        };

        Self {
            name: s.name.clone(),
            pk: s.pk,
            running,
            waiting: s.waiting_process_count,
            processes: format!("{}/{}", s.running_process_count, s.max_processes),
            calcjobs: format!("{}/{}", s.running_calcjob_count, s.max_calcjobs),
            workflows: format!("{}/{}", s.running_workflow_count, s.max_workflows),
            created: s.ctime.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}
