//! Snapshot and control payloads for the scheduler API.

use serde::{Deserialize, Serialize};

/// Point-in-time summary of one scheduler.
///
/// Replaced wholesale on every successful poll; never mutated locally outside
/// the edit guards for the three `max_*` limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Unique scheduler name (the identity used in every endpoint path).
    pub name: String,

    /// Primary key of the backing node.
    pub pk: i64,

    /// Creation time, already formatted by the server.
    #[serde(default)]
    pub ctime: Option<String>,

    /// Number of processes waiting to be scheduled.
    pub waiting_process_count: u32,

    /// Number of processes currently running.
    pub running_process_count: u32,

    /// Number of calcjobs currently running.
    pub running_calcjob_count: u32,

    /// Number of workflows currently running.
    pub running_workflow_count: u32,

    /// Maximum concurrent processes.
    pub max_processes: u32,

    /// Maximum concurrent calcjobs.
    pub max_calcjobs: u32,

    /// Maximum concurrent workflows.
    pub max_workflows: u32,

    /// Whether the scheduler is running (present in list responses).
    #[serde(default)]
    pub running: Option<bool>,
}

/// Daemon liveness snapshot from the second, independently-polled endpoint.
///
/// Never merged with [`Scheduler`]; each updates its own slice of state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonStatus {
    /// Scheduler name this daemon backs.
    pub name: String,

    /// Whether the daemon process is alive.
    pub running: bool,

    /// Daemon process ID, when running.
    #[serde(default)]
    pub pid: Option<u32>,

    /// CPU usage in percent, when the daemon reports it.
    #[serde(default)]
    pub cpu: Option<f64>,

    /// Memory usage, when the daemon reports it.
    #[serde(default)]
    pub memory: Option<f64>,

    /// Creation time, already formatted by the server.
    #[serde(default)]
    pub ctime: Option<String>,

    /// Daemon start time, already formatted by the server.
    #[serde(default)]
    pub start_time: Option<String>,
}

/// Request body for `POST /scheduler/start` and `POST /scheduler/add`.
///
/// Unset limits are omitted from the JSON so the server keeps its own
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerControl {
    /// Scheduler name.
    pub name: String,

    /// Maximum concurrent calcjobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_calcjobs: Option<u32>,

    /// Maximum concurrent workflows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workflows: Option<u32>,

    /// Maximum concurrent processes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<u32>,

    /// Run the daemon in the foreground. Always `false` from this client.
    #[serde(default)]
    pub foreground: bool,
}

impl SchedulerControl {
    /// Control body addressing a scheduler by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Acknowledgement body returned by `POST /scheduler/delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation message.
    pub message: String,
}
