//! Bounded sliding-window time series for the dashboard charts.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use schedmon_types::{DaemonStatus, Scheduler};

/// Samples kept per metric. Oldest is evicted first.
pub const TIME_SERIES_CAPACITY: usize = 20;

/// A single plotted point. The timestamp is client-observed at emission time,
/// not server time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the snapshot carrying this value was observed.
    pub at: DateTime<Utc>,
    /// The metric value.
    pub value: f64,
}

/// Append-only buffer with FIFO eviction. Insertion order is meaningful: it
/// is the chart's x-axis.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl TimeSeries {
    /// A buffer with the standard dashboard capacity.
    pub fn new() -> Self {
        Self::with_capacity(TIME_SERIES_CAPACITY)
    }

    /// A buffer with an explicit capacity. Zero is clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the buffer is full.
    pub fn append(&mut self, at: DateTime<Utc>, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { at, value });
    }

    /// Owned copy of the window, oldest first. Callers must not assume the
    /// buffer can be mutated through the returned vector.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples (view unmount).
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::new()
    }
}

/// The six dashboard metrics, driven by the two poll endpoints but logically
/// independent: a stall on one endpoint leaves the others' buffers untouched.
#[derive(Debug, Default)]
pub struct MetricSet {
    /// Running process count (scheduler summary).
    pub running_processes: TimeSeries,
    /// Waiting process count (scheduler summary).
    pub waiting_processes: TimeSeries,
    /// Running calcjob count (scheduler summary).
    pub running_calcjobs: TimeSeries,
    /// Running workflow count (scheduler summary).
    pub running_workflows: TimeSeries,
    /// CPU usage percentage (daemon status).
    pub cpu: TimeSeries,
    /// Memory usage (daemon status).
    pub memory: TimeSeries,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the four counters from a scheduler summary snapshot.
    pub fn record_scheduler(&mut self, at: DateTime<Utc>, snapshot: &Scheduler) {
        self.running_processes
            .append(at, snapshot.running_process_count as f64);
        self.waiting_processes
            .append(at, snapshot.waiting_process_count as f64);
        self.running_calcjobs
            .append(at, snapshot.running_calcjob_count as f64);
        self.running_workflows
            .append(at, snapshot.running_workflow_count as f64);
    }

    /// Record cpu/memory from a daemon status snapshot. A daemon that reports
    /// no usage (stopped, or just started) is plotted as zero.
    pub fn record_daemon(&mut self, at: DateTime<Utc>, status: &DaemonStatus) {
        self.cpu.append(at, status.cpu.unwrap_or(0.0));
        self.memory.append(at, status.memory.unwrap_or(0.0));
    }

    /// Drop all samples in every buffer.
    pub fn clear(&mut self) {
        self.running_processes.clear();
        self.waiting_processes.clear();
        self.running_calcjobs.clear();
        self.running_workflows.clear();
        self.cpu.clear();
        self.memory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn scheduler_snapshot(running: u32, waiting: u32) -> Scheduler {
        Scheduler {
            name: "test".to_string(),
            pk: 1,
            ctime: None,
            waiting_process_count: waiting,
            running_process_count: running,
            running_calcjob_count: 2,
            running_workflow_count: 1,
            max_processes: 100,
            max_calcjobs: 50,
            max_workflows: 20,
            running: Some(true),
        }
    }

    #[test]
    fn test_append_below_capacity_keeps_order() {
        let mut series = TimeSeries::new();
        for i in 0..5 {
            series.append(ts(i), i as f64);
        }

        let window = series.snapshot();
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].value, 0.0);
        assert_eq!(window[4].value, 4.0);
    }

    #[test]
    fn test_eviction_retains_most_recent_twenty() {
        let mut series = TimeSeries::new();
        for i in 0..100 {
            series.append(ts(i), i as f64);
        }

        assert_eq!(series.len(), TIME_SERIES_CAPACITY);
        let window = series.snapshot();
        assert_eq!(window[0].value, 80.0);
        assert_eq!(window[19].value, 99.0);
        assert_eq!(series.latest().unwrap().value, 99.0);
        // Still strictly in arrival order after wrap-around.
        for pair in window.windows(2) {
            assert!(pair[0].at < pair[1].at);
        }
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut series = TimeSeries::new();
        series.append(ts(0), 1.0);

        let mut window = series.snapshot();
        window.clear();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut series = TimeSeries::new();
        series.append(ts(0), 1.0);
        series.clear();
        assert!(series.is_empty());
        assert_eq!(series.latest(), None);
    }

    #[test]
    fn test_metric_set_endpoint_independence() {
        let mut metrics = MetricSet::new();

        // Three scheduler snapshots arrive while the daemon endpoint stalls.
        for i in 0..3 {
            metrics.record_scheduler(ts(i), &scheduler_snapshot(i as u32, 0));
        }

        assert_eq!(metrics.running_processes.len(), 3);
        assert_eq!(metrics.waiting_processes.len(), 3);
        assert!(metrics.cpu.is_empty());
        assert!(metrics.memory.is_empty());
    }

    #[test]
    fn test_missing_daemon_usage_plots_as_zero() {
        let mut metrics = MetricSet::new();
        let status = DaemonStatus {
            name: "test".to_string(),
            running: false,
            pid: None,
            cpu: None,
            memory: None,
            ctime: None,
            start_time: None,
        };

        metrics.record_daemon(ts(0), &status);
        assert_eq!(metrics.cpu.latest().unwrap().value, 0.0);
        assert_eq!(metrics.memory.latest().unwrap().value, 0.0);
    }
}
