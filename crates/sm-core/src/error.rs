//! Error types for the drill engine.

use thiserror::Error;

/// Result type for drill operations.
pub type DrillResult<T> = Result<T, DrillError>;

/// Errors that can occur while configuring or reporting on a drill.
///
/// Bad answers are never errors: they are scored as mistakes.
#[derive(Debug, Error)]
pub enum DrillError {
    /// The configuration cannot produce a playable session.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A summary could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
