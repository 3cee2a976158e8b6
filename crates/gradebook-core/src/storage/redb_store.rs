//! redb-backed record store.
//!
//! One table, `students`, maps the `u64` record id to a versioned record body
//! (see [`crate::formats`]). The table is created when the database is opened,
//! never lazily on a request path.

use super::RecordStore;
use crate::formats::{decode_record, encode_record};
use crate::{NewStudent, StoreError, StudentId, StudentRecord};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::{Path, PathBuf};

const STUDENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("students");

/// A [`RecordStore`] persisted in a redb file.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl RedbStore {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;

        let txn = db.begin_write()?;
        {
            let _table = txn.open_table(STUDENTS)?;
        }
        txn.commit()?;

        Ok(Self { db, path })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for RedbStore {
    fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError> {
        let body = encode_record(&student)?;

        let txn = self.db.begin_write()?;
        let id = {
            let mut table = txn.open_table(STUDENTS)?;
            let next = match table.last()? {
                Some((key, _)) => key.value().checked_add(1).ok_or(StoreError::IdsExhausted)?,
                None => 1,
            };
            table.insert(next, body.as_slice())?;
            StudentId(next)
        };
        txn.commit()?;

        Ok(id)
    }

    fn get(&self, id: StudentId) -> Result<Option<StudentRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STUDENTS)?;
        match table.get(id.0)? {
            Some(body) => Ok(Some(decode_record(id, body.value())?)),
            None => Ok(None),
        }
    }

    fn all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STUDENTS)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (key, body) = entry?;
            records.push(decode_record(StudentId(key.value()), body.value())?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STUDENTS)?;
        Ok(table.len()?)
    }
}
