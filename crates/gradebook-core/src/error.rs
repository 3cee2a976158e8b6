//! # Error Types
//!
//! Errors raised by the record store and the record format.

use thiserror::Error;

/// Errors from a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("record encoding error: {0}")]
    Encoding(#[from] postcard::Error),

    #[error("empty record payload")]
    EmptyRecord,

    #[error("unsupported record format version {0}")]
    UnsupportedVersion(u8),

    #[error("record store lock poisoned")]
    Poisoned,

    #[error("record id space exhausted")]
    IdsExhausted,
}
