//! schedmon library surface.
//!
//! The binary in `main.rs` consumes these modules; they are also exported
//! here so integration tests can drive the client and dispatcher directly.

pub mod client;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use client::ApiClient;
pub use dispatch::{ActionDispatcher, DeleteOutcome};
pub use error::CliError;
