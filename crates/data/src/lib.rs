//! Persistence for the Tributary candle indexer.
//!
//! - [`Store`]: storage backend contract (point loads, atomic commits, range queries)
//! - [`UnitOfWork`]: stages every write of one event and commits them together
//! - [`MemoryStore`]: in-process backend used for replays and tests
//! - [`repositories::Database`]: PostgreSQL backend built on sqlx

/// Storage errors.
pub mod error;
/// In-memory store.
pub mod memory;
/// PostgreSQL repositories.
pub mod repositories;
/// Store contract and change sets.
pub mod store;
/// Per-event unit of work.
pub mod unit_of_work;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use repositories::Database;
pub use store::{ChangeSet, Store};
pub use unit_of_work::{Entity, UnitOfWork};
