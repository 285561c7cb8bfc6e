//! # schedmon-types
//!
//! Wire data model shared by the sync engine and the API client.
//!
//! The server is a black-box HTTP collaborator; every type here mirrors a
//! JSON payload it produces or consumes:
//!
//! - [`Scheduler`] — scheduler summary snapshot (`/scheduler/data/{name}`,
//!   `/scheduler/list`, and the body of every mutating response)
//! - [`DaemonStatus`] — daemon liveness snapshot (`/scheduler/status/{name}`)
//! - [`SchedulerControl`] — request body for `start`/`add`
//! - [`LimitKind`] — the three editable concurrency limits and their
//!   endpoint/body-field mapping

mod limit;
mod status;

pub use limit::{LimitKind, ParseLimitKindError};
pub use status::{DaemonStatus, DeleteResponse, Scheduler, SchedulerControl};
