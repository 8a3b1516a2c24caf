//! Gate configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by gates mounted from one [`VariantGate`](crate::VariantGate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Resolver timeout in milliseconds; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
    /// Branch label for an enabled flag
    pub flag_on_label: String,
    /// Branch label for a disabled flag
    pub flag_off_label: String,
}

impl GateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With resolver timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Without resolver timeout
    #[inline]
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.timeout_ms = None;
        self
    }

    /// With flag branch labels
    #[must_use]
    pub fn with_flag_labels(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.flag_on_label = on.into();
        self.flag_off_label = off.into();
        self
    }

    /// Resolver timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Some(3_000),
            flag_on_label: "on".to_string(),
            flag_off_label: "off".to_string(),
        }
    }
}
