use meeple_bgg::EnrichError;
use meeple_core::BoundsError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Argument outside the accepted range
    #[error("{0}")]
    Bounds(#[from] BoundsError),

    #[error("{0}")]
    Enrich(#[from] EnrichError),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
