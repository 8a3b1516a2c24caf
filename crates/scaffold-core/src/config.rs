//! Kit configuration

use crate::error::KitResult;
use scaffold_content::RenderOptions;
use scaffold_gate::GateConfig;
use serde::{Deserialize, Serialize};

/// Default number of memoized renders
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_024;

/// Configuration for a [`ScaffoldKit`](crate::ScaffoldKit)
///
/// Every section is optional in a configuration document; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// Options for every render
    pub render: RenderOptions,
    /// Options for every mounted gate
    pub gate: GateConfig,
    /// Maximum memoized renders
    pub cache_capacity: u64,
}

impl KitConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document
    ///
    /// # Errors
    /// `KitError::Config` if the document is malformed
    pub fn from_json_str(doc: &str) -> KitResult<Self> {
        let config: Self = serde_json::from_str(doc)?;
        tracing::debug!(
            cache_capacity = config.cache_capacity,
            timeout_ms = ?config.gate.timeout_ms,
            "kit configuration loaded"
        );
        Ok(config)
    }

    /// With render options
    #[inline]
    #[must_use]
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// With gate configuration
    #[inline]
    #[must_use]
    pub fn with_gate(mut self, gate: GateConfig) -> Self {
        self.gate = gate;
        self
    }

    /// With memoized render capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            gate: GateConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
