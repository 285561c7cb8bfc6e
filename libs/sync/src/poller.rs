//! Periodic status polling with cancellation-safe rescheduling.
//!
//! The poller runs two independent loops against the two status endpoints
//! (scheduler summary, daemon status). Each loop fetches immediately on
//! activation and then on every interval tick, emitting a timestamped
//! [`SnapshotEvent`] per successful fetch. The loops also wake on a shared
//! refresh signal so mutating actions can force an out-of-band poll without
//! disturbing the periodic cadence.
//!
//! Restarting the poller (new target or new interval) cancels the live
//! schedule first; a fetch that is still in flight when its schedule is
//! cancelled has its result discarded. Each schedule owns its own event
//! channel, so snapshots a cancelled schedule already buffered die with the
//! superseded receiver instead of leaking into the new one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schedmon_types::{DaemonStatus, Scheduler};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Buffered snapshot events between the poll loops and the view task.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Supported refresh cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollInterval {
    /// 1 second.
    Fast,
    /// 3 seconds.
    #[default]
    Normal,
    /// 5 seconds.
    Slow,
    /// 30 seconds.
    Background,
}

impl PollInterval {
    /// All cadences, fastest first.
    pub const ALL: [PollInterval; 4] = [Self::Fast, Self::Normal, Self::Slow, Self::Background];

    pub fn as_millis(&self) -> u64 {
        match self {
            Self::Fast => 1_000,
            Self::Normal => 3_000,
            Self::Slow => 5_000,
            Self::Background => 30_000,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    /// Look up a cadence by its millisecond value.
    pub fn from_millis(ms: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_millis() == ms)
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// Async source of the two status payloads. Implemented by the real API
/// client and by test doubles.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    /// Fetch the scheduler summary for `name`.
    async fn scheduler_data(&self, name: &str) -> anyhow::Result<Scheduler>;

    /// Fetch the daemon status for `name`.
    async fn daemon_status(&self, name: &str) -> anyhow::Result<DaemonStatus>;
}

/// Payload of one successful poll.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Scheduler(Scheduler),
    Daemon(DaemonStatus),
}

/// A successful poll result, stamped with the client-observed time at
/// emission. Used as the time-series x-value; server time is not consulted.
#[derive(Debug, Clone)]
pub struct SnapshotEvent {
    pub observed_at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

/// Which of the two endpoints a loop drives.
#[derive(Debug, Clone, Copy)]
enum PollEndpoint {
    Summary,
    Daemon,
}

impl PollEndpoint {
    fn name(&self) -> &'static str {
        match self {
            Self::Summary => "scheduler_data",
            Self::Daemon => "daemon_status",
        }
    }
}

/// Handle that forces an immediate out-of-band poll on both loops.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: watch::Sender<u64>,
}

impl RefreshHandle {
    /// Wake both poll loops for an immediate fetch. Coalesces if the loops
    /// have not caught up yet.
    pub fn poke(&self) {
        self.tx.send_modify(|n| *n = n.wrapping_add(1));
    }
}

/// One live schedule: the pair of loop tasks plus their cancellation flag.
struct PollSchedule {
    cancel_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl PollSchedule {
    fn cancel(&mut self) {
        let _ = self.cancel_tx.send(true);
        self.tasks.clear();
    }
}

/// Schedules periodic fetches and fans results out as [`SnapshotEvent`]s.
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    refresh_tx: watch::Sender<u64>,
    schedule: Option<PollSchedule>,
}

impl StatusPoller {
    /// Create an idle poller.
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        let (refresh_tx, _) = watch::channel(0u64);

        Self {
            source,
            refresh_tx,
            schedule: None,
        }
    }

    /// Start polling `target` at `interval`, fetching immediately, and
    /// return the new schedule's event stream. Any live schedule is
    /// cancelled first, so changing the target or the interval restarts
    /// cleanly: exactly the new parameters are in effect from the next tick,
    /// and snapshots the old schedule had already buffered stay in its
    /// abandoned channel rather than surfacing here.
    pub fn start(&mut self, target: &str, interval: PollInterval) -> mpsc::Receiver<SnapshotEvent> {
        self.stop();

        info!(scheduler = target, interval = %interval, "Starting status poll schedule");

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let tasks = [PollEndpoint::Summary, PollEndpoint::Daemon]
            .into_iter()
            .map(|endpoint| {
                tokio::spawn(run_poll_loop(
                    Arc::clone(&self.source),
                    endpoint,
                    target.to_string(),
                    interval.as_duration(),
                    events_tx.clone(),
                    cancel_rx.clone(),
                    self.refresh_tx.subscribe(),
                ))
            })
            .collect();

        self.schedule = Some(PollSchedule { cancel_tx, tasks });
        events_rx
    }

    /// Cancel the live schedule, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(mut schedule) = self.schedule.take() {
            debug!("Cancelling status poll schedule");
            schedule.cancel();
        }
    }

    /// True while a schedule is live.
    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Handle for out-of-band refreshes, e.g. right after a mutating action.
    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle {
            tx: self.refresh_tx.clone(),
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_poll_loop(
    source: Arc<dyn StatusSource>,
    endpoint: PollEndpoint,
    target: String,
    interval: Duration,
    events_tx: mpsc::Sender<SnapshotEvent>,
    mut cancel_rx: watch::Receiver<bool>,
    mut refresh_rx: watch::Receiver<u64>,
) {
    let mut timer = tokio::time::interval(interval);
    // A delayed tick must not cause a burst of catch-up fetches.
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = timer.tick() => {}
            changed = refresh_rx.changed() => {
                if changed.is_err() {
                    // Poller dropped.
                    break;
                }
                debug!(endpoint = endpoint.name(), "Out-of-band refresh requested");
            }
            _ = cancel_rx.changed() => {
                if *cancel_rx.borrow() {
                    break;
                }
                continue;
            }
        }

        let fetched = match endpoint {
            PollEndpoint::Summary => source
                .scheduler_data(&target)
                .await
                .map(Snapshot::Scheduler),
            PollEndpoint::Daemon => source.daemon_status(&target).await.map(Snapshot::Daemon),
        };

        // The schedule may have been cancelled while the fetch was in
        // flight; its result must not be applied.
        if *cancel_rx.borrow() {
            break;
        }

        match fetched {
            Ok(snapshot) => {
                let event = SnapshotEvent {
                    observed_at: Utc::now(),
                    snapshot,
                };
                if events_tx.send(event).await.is_err() {
                    // Subscriber gone; the schedule is useless now.
                    break;
                }
            }
            Err(error) => {
                // Transient: log, skip this tick, keep the schedule.
                warn!(
                    endpoint = endpoint.name(),
                    scheduler = %target,
                    error = %error,
                    "Poll tick failed"
                );
            }
        }
    }

    debug!(endpoint = endpoint.name(), scheduler = %target, "Poll loop exited");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio::time::{timeout, Instant};

    use super::*;

    #[derive(Default)]
    struct MockSource {
        scheduler_calls: AtomicUsize,
        daemon_calls: AtomicUsize,
        fail_scheduler: AtomicBool,
        fetch_delay_ms: AtomicUsize,
    }

    impl MockSource {
        fn scheduler_snapshot(name: &str, running: u32) -> Scheduler {
            Scheduler {
                name: name.to_string(),
                pk: 1,
                ctime: None,
                waiting_process_count: 0,
                running_process_count: running,
                running_calcjob_count: 0,
                running_workflow_count: 0,
                max_processes: 100,
                max_calcjobs: 50,
                max_workflows: 20,
                running: Some(true),
            }
        }
    }

    #[async_trait]
    impl StatusSource for MockSource {
        async fn scheduler_data(&self, name: &str) -> anyhow::Result<Scheduler> {
            let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay as u64)).await;
            }
            let calls = self.scheduler_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_scheduler.load(Ordering::SeqCst) {
                anyhow::bail!("simulated 500 on call {}", calls);
            }
            Ok(Self::scheduler_snapshot(name, calls as u32))
        }

        async fn daemon_status(&self, name: &str) -> anyhow::Result<DaemonStatus> {
            self.daemon_calls.fetch_add(1, Ordering::SeqCst);
            Ok(DaemonStatus {
                name: name.to_string(),
                running: true,
                pid: Some(4242),
                cpu: Some(12.5),
                memory: Some(1024.0),
                ctime: None,
                start_time: None,
            })
        }
    }

    async fn recv_two(events: &mut mpsc::Receiver<SnapshotEvent>) -> Vec<SnapshotEvent> {
        let mut out = Vec::new();
        for _ in 0..2 {
            out.push(events.recv().await.expect("event stream ended"));
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_on_activation() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source.clone());

        let mut events = poller.start("prod", PollInterval::Normal);

        let first_two = recv_two(&mut events).await;
        let mut saw_scheduler = false;
        let mut saw_daemon = false;
        for event in first_two {
            match event.snapshot {
                Snapshot::Scheduler(s) => {
                    assert_eq!(s.name, "prod");
                    saw_scheduler = true;
                }
                Snapshot::Daemon(d) => {
                    assert_eq!(d.name, "prod");
                    saw_daemon = true;
                }
            }
        }
        assert!(saw_scheduler && saw_daemon);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_configured_interval() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source);

        let mut events = poller.start("prod", PollInterval::Normal);

        // Immediate pair.
        recv_two(&mut events).await;
        let t0 = Instant::now();

        // Next pair arrives exactly one interval later under the paused
        // clock's auto-advance.
        recv_two(&mut events).await;
        let elapsed = t0.elapsed();
        assert_eq!(elapsed, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_skipped_next_tick_fires() {
        let source = Arc::new(MockSource::default());
        source.fail_scheduler.store(true, Ordering::SeqCst);
        let mut poller = StatusPoller::new(source.clone());

        let mut events = poller.start("prod", PollInterval::Fast);

        // Only daemon snapshots come through while the summary endpoint
        // returns errors, and they keep coming tick after tick.
        for _ in 0..3 {
            let event = events.recv().await.unwrap();
            assert!(matches!(event.snapshot, Snapshot::Daemon(_)));
        }

        // The failing endpoint kept being polled (no schedule cancellation).
        assert!(source.scheduler_calls.load(Ordering::SeqCst) >= 2);

        // Once the endpoint recovers, its snapshots flow again.
        source.fail_scheduler.store(false, Ordering::SeqCst);
        loop {
            let event = events.recv().await.unwrap();
            if let Snapshot::Scheduler(s) = event.snapshot {
                assert_eq!(s.name, "prod");
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_discards_inflight_fetch() {
        let source = Arc::new(MockSource::default());
        // Make every summary fetch take 10s so the first one is still in
        // flight when the schedule is replaced.
        source.fetch_delay_ms.store(10_000, Ordering::SeqCst);
        let mut poller = StatusPoller::new(source.clone());

        let _old_events = poller.start("old-target", PollInterval::Normal);
        let mut events = poller.start("new-target", PollInterval::Fast);

        // Nothing from the old schedule may surface.
        for _ in 0..6 {
            let event = events.recv().await.unwrap();
            match event.snapshot {
                Snapshot::Scheduler(s) => assert_eq!(s.name, "new-target"),
                Snapshot::Daemon(d) => assert_eq!(d.name, "new-target"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_drops_buffered_snapshots() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source.clone());

        // Let the old schedule's activation fetches land in its channel
        // without anyone reading them, then switch targets.
        let _old_events = poller.start("old-target", PollInterval::Fast);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(source.scheduler_calls.load(Ordering::SeqCst) >= 1);

        let mut events = poller.start("new-target", PollInterval::Fast);

        // The buffered old-target snapshots stay in the abandoned channel;
        // the new stream carries the new target only, from its first event.
        for _ in 0..4 {
            let event = events.recv().await.unwrap();
            match event.snapshot {
                Snapshot::Scheduler(s) => assert_eq!(s.name, "new-target"),
                Snapshot::Daemon(d) => assert_eq!(d.name, "new-target"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_change_takes_effect_from_next_tick() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source);

        let mut events = poller.start("prod", PollInterval::Background);
        recv_two(&mut events).await;

        let mut events = poller.start("prod", PollInterval::Fast);
        // Restart fetches immediately, then settles on the 1s cadence.
        recv_two(&mut events).await;
        let t0 = Instant::now();
        recv_two(&mut events).await;
        assert_eq!(t0.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_polls_out_of_band() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source.clone());

        let mut events = poller.start("prod", PollInterval::Background);
        recv_two(&mut events).await;
        assert_eq!(source.scheduler_calls.load(Ordering::SeqCst), 1);

        // A poke wakes both loops well before the 30s tick.
        poller.refresh_handle().poke();
        let refreshed = timeout(Duration::from_secs(1), recv_two(&mut events))
            .await
            .expect("refresh did not trigger an immediate poll");
        assert_eq!(refreshed.len(), 2);
        assert_eq!(source.scheduler_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_emission() {
        let source = Arc::new(MockSource::default());
        let mut poller = StatusPoller::new(source);

        let mut events = poller.start("prod", PollInterval::Fast);
        recv_two(&mut events).await;

        poller.stop();
        assert!(!poller.is_running());

        // Drain whatever was already buffered; afterwards the stream is
        // silent.
        let quiet = timeout(Duration::from_secs(5), async {
            while let Some(_event) = events.recv().await {}
        })
        .await;
        assert!(quiet.is_err() || events.try_recv().is_err());
    }

    #[test]
    fn test_poll_interval_lookup() {
        assert_eq!(PollInterval::from_millis(1000), Some(PollInterval::Fast));
        assert_eq!(PollInterval::from_millis(3000), Some(PollInterval::Normal));
        assert_eq!(PollInterval::from_millis(5000), Some(PollInterval::Slow));
        assert_eq!(
            PollInterval::from_millis(30000),
            Some(PollInterval::Background)
        );
        assert_eq!(PollInterval::from_millis(2000), None);
    }
}
