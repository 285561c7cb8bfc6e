//! The three editable concurrency limits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the scheduler's editable concurrency limits.
///
/// Each kind maps to its own `set_max_*` endpoint and body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    /// Overall process limit (`max_processes`).
    Processes,
    /// Calcjob limit (`max_calcjobs`).
    Calcjobs,
    /// Workflow limit (`max_workflows`).
    Workflows,
}

impl LimitKind {
    /// All kinds, in display order.
    pub const ALL: [LimitKind; 3] = [Self::Processes, Self::Calcjobs, Self::Workflows];

    /// The JSON body field carrying the new value.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Processes => "max_processes",
            Self::Calcjobs => "max_calcjobs",
            Self::Workflows => "max_workflows",
        }
    }

    /// Path of the mutating endpoint, relative to the API base.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Processes => "/scheduler/set_max_processes",
            Self::Calcjobs => "/scheduler/set_max_calcjobs",
            Self::Workflows => "/scheduler/set_max_workflows",
        }
    }

    /// Human-readable label for notifications and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Processes => "max processes",
            Self::Calcjobs => "max calcjobs",
            Self::Workflows => "max workflows",
        }
    }

    /// Read this limit out of a scheduler snapshot.
    pub fn value_of(&self, scheduler: &crate::Scheduler) -> u32 {
        match self {
            Self::Processes => scheduler.max_processes,
            Self::Calcjobs => scheduler.max_calcjobs,
            Self::Workflows => scheduler.max_workflows,
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Processes => "processes",
            Self::Calcjobs => "calcjobs",
            Self::Workflows => "workflows",
        };
        write!(f, "{}", name)
    }
}

/// Error parsing a [`LimitKind`] from a CLI argument.
#[derive(Debug, Error)]
#[error("unknown limit kind '{0}' (expected processes, calcjobs, or workflows)")]
pub struct ParseLimitKindError(String);

impl FromStr for LimitKind {
    type Err = ParseLimitKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processes" => Ok(Self::Processes),
            "calcjobs" => Ok(Self::Calcjobs),
            "workflows" => Ok(Self::Workflows),
            other => Err(ParseLimitKindError(other.to_string())),
        }
    }
}
