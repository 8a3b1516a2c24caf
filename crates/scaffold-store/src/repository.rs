//! Repository interface
//!
//! Handlers depend on [`Repository`] only, so any storage engine can back
//! them without touching handler logic.

use crate::error::StoreResult;
use crate::record::{Record, RecordId};

/// CRUD capability set over values of type `T`
#[async_trait::async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Fetch one record
    async fn get(&self, id: RecordId) -> StoreResult<Record<T>>;

    /// All records in insertion order
    async fn list(&self) -> StoreResult<Vec<Record<T>>>;

    /// Store a new value under a fresh id
    async fn insert(&self, value: T) -> StoreResult<Record<T>>;

    /// Replace the value of an existing record
    async fn update(&self, id: RecordId, value: T) -> StoreResult<Record<T>>;

    /// Remove a record, returning it
    async fn delete(&self, id: RecordId) -> StoreResult<Record<T>>;
}
