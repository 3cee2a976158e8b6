//! # Storage Module
//!
//! Persistence of student records.
//!
//! - [`RedbStore`]: embedded redb database (ACID, crash safe, single writer)
//! - [`MemoryStore`]: process-local map, for tests and dry runs
//!
//! Both assign ids 1, 2, 3… in insertion order and return records sorted by id.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::{NewStudent, StoreError, StudentId, StudentRecord};

/// The RecordStore trait defines the operations the application needs.
///
/// Records are append-only: there is no update and no delete. Implementations
/// use interior mutability so one store can be shared behind an `Arc`.
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return its assigned id.
    ///
    /// Either the whole record is committed or nothing is.
    fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError>;

    /// Fetch a single record.
    fn get(&self, id: StudentId) -> Result<Option<StudentRecord>, StoreError>;

    /// All records, ordered by id.
    fn all(&self) -> Result<Vec<StudentRecord>, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<u64, StoreError>;
}
