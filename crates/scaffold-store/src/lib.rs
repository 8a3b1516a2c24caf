//! Scaffold Store
//!
//! Repository interface with capability set `{get, list, insert, update,
//! delete}` and a concurrent in-memory implementation for demo CRUD
//! endpoints. Real deployments implement [`Repository`] over their own
//! storage engine.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod record;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRepository;
pub use record::{Record, RecordId};
pub use repository::Repository;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
