//! # schedmon-sync
//!
//! The live-state synchronization engine behind the scheduler dashboard.
//!
//! ## Components
//!
//! - [`TimeSeries`] / [`MetricSet`]: bounded sliding-window buffers for
//!   plotting, fed by poll snapshots. FIFO eviction at capacity 20.
//! - [`EditGuard`] / [`EditSet`]: per-field state machine that keeps poll
//!   responses from overwriting an in-progress edit, and produces exactly one
//!   commit request when the edit finishes.
//! - [`StatusPoller`]: two independently-timed fetch loops (scheduler
//!   summary, daemon status) emitting timestamped snapshot events, with
//!   cancellation-safe rescheduling and an out-of-band refresh signal.
//!
//! ## Concurrency model
//!
//! Everything runs on the tokio runtime; the poller's loops are the only
//! spawned tasks. Engine state (`MetricSet`, `EditSet`) is owned by the view
//! task that drains the event channel, so the `EditGuard` phase is the sole
//! arbitration between poll results and user input. No locks.
//!
//! ## Failure containment
//!
//! A failed poll tick is logged and skipped; the next tick still fires.
//! Nothing in this crate is fatal to the process.

mod edit;
mod poller;
mod timeseries;

pub use edit::{CommitRequest, EditError, EditGuard, EditPhase, EditSet};
pub use poller::{
    PollInterval, RefreshHandle, Snapshot, SnapshotEvent, StatusPoller, StatusSource,
};
pub use timeseries::{MetricSet, Sample, TimeSeries, TIME_SERIES_CAPACITY};
