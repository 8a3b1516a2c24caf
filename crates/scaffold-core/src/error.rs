//! Error types for Scaffold Core

use scaffold_gate::GateError;
use scaffold_store::StoreError;

/// Main kit error type
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    /// Configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Gate could not be mounted
    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    /// Stored payload could not be loaded
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for kit operations
pub type KitResult<T> = Result<T, KitError>;

impl KitError {
    /// Check if the error is a missing stored record
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}
