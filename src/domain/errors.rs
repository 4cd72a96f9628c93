//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Task tracker error: {0}")]
    TaskTracker(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    /// A client could not be built at startup (missing credentials or failed self-check).
    #[error("{0} client not configured")]
    NotConfigured(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),
}
