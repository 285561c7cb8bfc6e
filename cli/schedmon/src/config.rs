//! Configuration for the schedmon CLI.

use anyhow::Result;
use schedmon_sync::PollInterval;
use tracing::warn;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheduler API base URL.
    pub api_url: String,

    /// Default cadence for `watch`.
    pub poll_interval: PollInterval,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/plugins/scheduler/api".to_string(),
            poll_interval: PollInterval::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_url = std::env::var("SCHEDMON_API_URL").unwrap_or(defaults.api_url);

        let poll_interval = match std::env::var("SCHEDMON_POLL_INTERVAL_MS") {
            Ok(raw) => match raw.parse::<u64>().ok().and_then(PollInterval::from_millis) {
                Some(interval) => interval,
                None => {
                    warn!(
                        raw = %raw,
                        default = %defaults.poll_interval,
                        "Unsupported poll interval, using default"
                    );
                    defaults.poll_interval
                }
            },
            Err(_) => defaults.poll_interval,
        };

        let request_timeout_secs = std::env::var("SCHEDMON_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        Ok(Self {
            api_url,
            poll_interval,
            request_timeout_secs,
        })
    }
}

/// Log filter directive, read separately from [`Config::from_env`] so the
/// tracing subscriber can be installed before the rest of the configuration
/// is loaded (and its fallback warnings are not lost).
pub fn log_filter() -> String {
    std::env::var("SCHEDMON_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}
