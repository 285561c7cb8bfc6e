//! Watch command - live-monitor one scheduler.
//!
//! Runs the status poller against both endpoints and prints a compact line
//! per snapshot. The engine does the work; this is display logic.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use schedmon_sync::{
    EditSet, MetricSet, PollInterval, Snapshot, SnapshotEvent, StatusPoller,
};
use schedmon_types::LimitKind;

use super::CommandContext;

/// Watch command.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Scheduler name.
    name: String,

    /// Poll interval in milliseconds (1000, 3000, 5000, or 30000).
    #[arg(long)]
    interval: Option<u64>,
}

impl WatchCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let interval = match self.interval {
            Some(ms) => PollInterval::from_millis(ms).ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported interval {}ms (choose 1000, 3000, 5000, or 30000)",
                    ms
                )
            })?,
            None => ctx.config.poll_interval,
        };

        let client = ctx.client()?;
        let mut poller = StatusPoller::new(client);
        let mut events = poller.start(&self.name, interval);

        println!(
            "Watching scheduler '{}' every {} (Ctrl-C to stop)",
            self.name, interval
        );

        // View state: sliding-window metrics plus the limit fields, which
        // only take snapshot values while clean.
        let mut metrics = MetricSet::new();
        let mut limits: Option<EditSet> = None;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping poll schedule");
                    break;
                }
                event = events.recv() => {
                    match event {
                        Some(event) => render_event(event, &mut metrics, &mut limits),
                        None => break,
                    }
                }
            }
        }

        poller.stop();
        metrics.clear();
        Ok(())
    }
}

fn render_event(event: SnapshotEvent, metrics: &mut MetricSet, limits: &mut Option<EditSet>) {
    let stamp = event.observed_at.format("%H:%M:%S");

    match event.snapshot {
        Snapshot::Scheduler(scheduler) => {
            metrics.record_scheduler(event.observed_at, &scheduler);
            let edits = limits.get_or_insert_with(|| EditSet::from_snapshot(&scheduler));
            edits.apply_snapshot(&scheduler);

            println!(
                "{}  processes {}/{} (waiting {})  calcjobs {}/{}  workflows {}/{}",
                stamp.to_string().dimmed(),
                scheduler.running_process_count,
                edits.guard(LimitKind::Processes).display_value(),
                scheduler.waiting_process_count,
                scheduler.running_calcjob_count,
                edits.guard(LimitKind::Calcjobs).display_value(),
                scheduler.running_workflow_count,
                edits.guard(LimitKind::Workflows).display_value(),
            );
        }
        Snapshot::Daemon(daemon) => {
            metrics.record_daemon(event.observed_at, &daemon);

            let state = if daemon.running {
                "up".green()
            } else {
                "down".red()
            };
            let cpu = metrics.cpu.latest().map(|s| s.value).unwrap_or(0.0);
            let memory = metrics.memory.latest().map(|s| s.value).unwrap_or(0.0);

            println!(
                "{}  daemon {}  pid {}  cpu {:.1}%  mem {:.0}  [{} samples]",
                stamp.to_string().dimmed(),
                state,
                daemon
                    .pid
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                cpu,
                memory,
                metrics.cpu.len(),
            );
        }
    }
}
