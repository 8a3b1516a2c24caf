//! Error types for variant gating
//!
//! - [`ResolveError`]: what a resolver returns when it cannot assign a variant
//! - [`ResolutionError`]: what the gate records and reports through `on_error`
//! - [`GateError`]: construction failures, returned to the caller

/// Failure reported by a [`VariantResolver`](crate::VariantResolver)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Resolution service could not be reached
    #[error("resolution service unavailable: {0}")]
    Unavailable(String),

    /// Service has no experiment or flag under this key
    #[error("unknown resolution key: {0}")]
    UnknownKey(String),

    /// Service answered with something that is not an assignment
    #[error("invalid assignment: {0}")]
    Invalid(String),
}

/// Terminal failure of one gate resolution attempt
///
/// Recovered locally: the gate renders its fallback branch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Resolver returned an error
    #[error("resolution of '{key}' rejected: {reason}")]
    Rejected { key: String, reason: String },

    /// Resolver did not answer within the configured timeout
    #[error("resolution of '{key}' timed out after {timeout_ms}ms")]
    TimedOut { key: String, timeout_ms: u64 },

    /// Resolver panicked
    #[error("resolver panicked while resolving '{key}'")]
    Panicked { key: String },
}

impl ResolutionError {
    /// Create rejection error
    pub fn rejected(key: impl Into<String>, source: &ResolveError) -> Self {
        Self::Rejected {
            key: key.into(),
            reason: source.to_string(),
        }
    }

    /// Key whose resolution failed
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Rejected { key, .. } | Self::TimedOut { key, .. } | Self::Panicked { key } => key,
        }
    }

    /// Check if error came from the timeout
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Errors while building or mounting a gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Control key does not name any branch
    #[error("control branch '{0}' is not among the branches")]
    MissingControlBranch(String),

    /// Mount attempted outside a tokio runtime
    #[error("no async runtime available to resolve variants")]
    NoRuntime,
}
