//! Fire-and-report mutating actions against the control endpoints.
//!
//! Each action is a single HTTP request. Success is reported to the user and
//! followed by an immediate out-of-band poll refresh; failure propagates to
//! the CLI's single error notification and mutates nothing. No action is
//! retried automatically.

use std::sync::Arc;

use tracing::debug;

use schedmon_sync::RefreshHandle;
use schedmon_types::{DeleteResponse, LimitKind, Scheduler, SchedulerControl};

use crate::client::ApiClient;
use crate::error::CliError;
use crate::output::{print_info, print_success};

/// Result of a delete request that may have been stopped before dispatch.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The server acknowledged the delete.
    Deleted(DeleteResponse),
    /// The user did not confirm; no request was issued.
    Aborted,
}

/// Dispatches mutating scheduler actions.
pub struct ActionDispatcher {
    client: Arc<ApiClient>,
    refresh: Option<RefreshHandle>,
}

impl ActionDispatcher {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            refresh: None,
        }
    }

    /// Wire up an out-of-band refresh to fire after successful mutations,
    /// independent of the periodic poll timer.
    pub fn with_refresh(mut self, handle: RefreshHandle) -> Self {
        self.refresh = Some(handle);
        self
    }

    /// Start a scheduler daemon.
    pub async fn start(&self, control: &SchedulerControl) -> Result<Scheduler, CliError> {
        let scheduler = self.client.start(control).await?;
        print_success(&format!("Scheduler '{}' started", scheduler.name));
        self.poke();
        Ok(scheduler)
    }

    /// Stop a running scheduler.
    pub async fn stop(&self, name: &str) -> Result<Scheduler, CliError> {
        let scheduler = self.client.stop(name).await?;
        print_success(&format!("Scheduler '{}' stopped", scheduler.name));
        self.poke();
        Ok(scheduler)
    }

    /// Register a new scheduler. The name is validated client-side; an empty
    /// name never reaches the network.
    pub async fn create(&self, control: &SchedulerControl) -> Result<Scheduler, CliError> {
        if control.name.trim().is_empty() {
            return Err(CliError::validation("scheduler name must not be empty"));
        }

        let scheduler = self.client.add(control).await?;
        print_success(&format!("Scheduler '{}' created", scheduler.name));
        self.poke();
        Ok(scheduler)
    }

    /// Delete a scheduler. Requires explicit confirmation; without it, no
    /// request is issued at all.
    pub async fn delete(&self, name: &str, confirmed: bool) -> Result<DeleteOutcome, CliError> {
        if !confirmed {
            debug!(name, "Delete not confirmed, skipping dispatch");
            print_info("Delete aborted.");
            return Ok(DeleteOutcome::Aborted);
        }

        let response = self.client.delete(name).await?;
        print_success(&response.message);
        self.poke();
        Ok(DeleteOutcome::Deleted(response))
    }

    /// Update one concurrency limit from raw user input. Parsing is base 10,
    /// uniformly; non-numeric input is a validation failure and never reaches
    /// the network.
    pub async fn set_limit(
        &self,
        name: &str,
        kind: LimitKind,
        raw_value: &str,
    ) -> Result<Scheduler, CliError> {
        let value = raw_value.trim().parse::<u32>().map_err(|_| {
            CliError::validation(format!("'{}' is not a valid {}", raw_value, kind.label()))
        })?;

        let scheduler = self.client.set_limit(name, kind, value).await?;
        print_success(&format!(
            "Scheduler '{}' {} set to {}",
            scheduler.name,
            kind.label(),
            kind.value_of(&scheduler)
        ));
        self.poke();
        Ok(scheduler)
    }

    fn poke(&self) {
        if let Some(handle) = &self.refresh {
            handle.poke();
        }
    }
}
