//! Resolver seam and an in-memory implementation
//!
//! The experiment / feature-flag service lives outside this crate; the gate
//! talks to it only through [`VariantResolver`].

use crate::config::GateConfig;
use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a resolver assigns to a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// Named experiment variant
    Variant(String),
    /// Boolean feature flag
    Flag(bool),
}

impl Assignment {
    /// Branch label this assignment selects
    ///
    /// Flags map to the configured on/off labels.
    #[must_use]
    pub fn into_label(self, config: &GateConfig) -> String {
        match self {
            Self::Variant(label) => label,
            Self::Flag(true) => config.flag_on_label.clone(),
            Self::Flag(false) => config.flag_off_label.clone(),
        }
    }
}

impl From<bool> for Assignment {
    fn from(enabled: bool) -> Self {
        Self::Flag(enabled)
    }
}

impl From<&str> for Assignment {
    fn from(label: &str) -> Self {
        Self::Variant(label.to_string())
    }
}

/// Asynchronous experiment / flag resolution service
#[async_trait::async_trait]
pub trait VariantResolver: Send + Sync {
    /// Resolve `key` into an assignment
    async fn resolve(&self, key: &str) -> Result<Assignment, ResolveError>;
}

/// Resolver serving fixed assignments from memory
///
/// Unknown keys are rejected with [`ResolveError::UnknownKey`].
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    assignments: HashMap<String, Assignment>,
}

impl StaticResolver {
    /// Create empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With assignment for key
    #[must_use]
    pub fn with_assignment(mut self, key: impl Into<String>, assignment: impl Into<Assignment>) -> Self {
        self.assignments.insert(key.into(), assignment.into());
        self
    }

    /// With variant label for key
    #[must_use]
    pub fn with_variant(self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.with_assignment(key, Assignment::Variant(label.into()))
    }

    /// With flag value for key
    #[must_use]
    pub fn with_flag(self, key: impl Into<String>, enabled: bool) -> Self {
        self.with_assignment(key, Assignment::Flag(enabled))
    }
}

#[async_trait::async_trait]
impl VariantResolver for StaticResolver {
    async fn resolve(&self, key: &str) -> Result<Assignment, ResolveError> {
        self.assignments
            .get(key)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownKey(key.to_string()))
    }
}
