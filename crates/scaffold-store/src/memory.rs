//! In-memory repository using dashmap

use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};
use crate::repository::Repository;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent in-memory repository
///
/// Not persistent. `list` returns records in insertion order.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: DashMap<RecordId, Slot<T>>,
    sequence: AtomicU64,
}

#[derive(Debug)]
struct Slot<T> {
    sequence: u64,
    record: Record<T>,
}

impl<T: Clone + Send + Sync + 'static> InMemoryRepository<T> {
    /// Create empty repository
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Store a value under a caller-chosen id
    ///
    /// # Errors
    /// `StoreError::AlreadyExists` if the id is taken
    pub fn insert_with_id(&self, id: RecordId, value: T) -> StoreResult<Record<T>> {
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                let record = Record::new(id, value);
                slot.insert(Slot {
                    sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
                    record: record.clone(),
                });
                tracing::trace!(%id, "record inserted");
                Ok(record)
            }
        }
    }

    /// Number of stored records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: Clone + Send + Sync + 'static> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: RecordId) -> StoreResult<Record<T>> {
        self.records
            .get(&id)
            .map(|slot| slot.record.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> StoreResult<Vec<Record<T>>> {
        let mut slots: Vec<(u64, Record<T>)> = self
            .records
            .iter()
            .map(|entry| (entry.sequence, entry.record.clone()))
            .collect();
        slots.sort_by_key(|(sequence, _)| *sequence);
        Ok(slots.into_iter().map(|(_, record)| record).collect())
    }

    async fn insert(&self, value: T) -> StoreResult<Record<T>> {
        self.insert_with_id(RecordId::new(), value)
    }

    async fn update(&self, id: RecordId, value: T) -> StoreResult<Record<T>> {
        let mut slot = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let current = slot.record.clone();
        slot.record = current.updated(value);
        tracing::trace!(%id, version = slot.record.version, "record updated");
        Ok(slot.record.clone())
    }

    async fn delete(&self, id: RecordId) -> StoreResult<Record<T>> {
        self.records
            .remove(&id)
            .map(|(_, slot)| slot.record)
            .ok_or(StoreError::NotFound(id))
    }
}
