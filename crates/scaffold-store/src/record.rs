//! Record identity and metadata

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ulid::Ulid;

/// Unique record identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Ulid);

impl RecordId {
    /// Generate new record ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

/// Stored value with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Record identifier
    pub id: RecordId,
    /// Stored value
    pub value: T,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, incremented by every update
    pub version: u64,
}

impl<T> Record<T> {
    /// New record at version 1
    #[must_use]
    pub fn new(id: RecordId, value: T) -> Self {
        let now = Utc::now();
        Self {
            id,
            value,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Replace value, bumping version and update time
    #[must_use]
    pub fn updated(self, value: T) -> Self {
        Self {
            value,
            updated_at: Utc::now(),
            version: self.version + 1,
            ..self
        }
    }
}
