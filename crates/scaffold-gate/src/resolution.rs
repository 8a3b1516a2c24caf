//! Resolution lifecycle of one mounted gate

use crate::error::ResolutionError;
use serde::{Deserialize, Serialize};

/// Lifecycle status
///
/// `Pending` is the only non-terminal status and is never re-entered
/// within one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Waiting on the resolver
    Pending,
    /// Variant assigned
    Resolved,
    /// Resolver failed or timed out
    Failed,
}

/// Snapshot of a gate's resolution
///
/// Only constructible through [`pending`](Self::pending),
/// [`resolved`](Self::resolved) and [`failed`](Self::failed), so a pending
/// snapshot can never carry a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantResolution {
    status: ResolutionStatus,
    variant: Option<String>,
    error: Option<ResolutionError>,
}

impl VariantResolution {
    /// Initial state
    #[inline]
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: ResolutionStatus::Pending,
            variant: None,
            error: None,
        }
    }

    /// Successful terminal state
    #[inline]
    #[must_use]
    pub fn resolved(variant: impl Into<String>) -> Self {
        Self {
            status: ResolutionStatus::Resolved,
            variant: Some(variant.into()),
            error: None,
        }
    }

    /// Failed terminal state
    #[inline]
    #[must_use]
    pub fn failed(error: ResolutionError) -> Self {
        Self {
            status: ResolutionStatus::Failed,
            variant: None,
            error: Some(error),
        }
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    /// Branch key chosen, once resolved
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Failure, once failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ResolutionError> {
        self.error.as_ref()
    }

    /// Check if still waiting on the resolver
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ResolutionStatus::Pending
    }

    /// Check if resolved or failed
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl Default for VariantResolution {
    fn default() -> Self {
        Self::pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_hides_variant() {
        let r = VariantResolution::pending();
        assert!(r.is_pending());
        assert!(r.variant().is_none());
        assert!(r.error().is_none());
    }

    #[test]
    fn resolved_exposes_variant() {
        let r = VariantResolution::resolved("B");
        assert_eq!(r.status(), ResolutionStatus::Resolved);
        assert_eq!(r.variant(), Some("B"));
        assert!(r.is_terminal());
    }

    #[test]
    fn failed_exposes_error_only() {
        let r = VariantResolution::failed(ResolutionError::Panicked { key: "k".into() });
        assert_eq!(r.status(), ResolutionStatus::Failed);
        assert!(r.variant().is_none());
        assert!(r.error().is_some());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ResolutionStatus::Resolved).unwrap();
        assert_eq!(json, "\"resolved\"");
    }
}
