//! In-memory record store.

use super::RecordStore;
use crate::{NewStudent, StoreError, StudentId, StudentRecord};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A [`RecordStore`] backed by a `BTreeMap`. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<StudentId, StudentRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let next = match records.last_key_value() {
            Some((last, _)) => last.0.checked_add(1).ok_or(StoreError::IdsExhausted)?,
            None => 1,
        };
        let id = StudentId(next);
        records.insert(id, StudentRecord::from_new(id, student));
        Ok(id)
    }

    fn get(&self, id: StudentId) -> Result<Option<StudentRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Averages;

    #[test]
    fn ids_increment_from_one() {
        let store = MemoryStore::new();
        let a = store
            .insert(NewStudent::new("a.png", Averages::default()))
            .expect("insert");
        let b = store
            .insert(NewStudent::new("b.png", Averages::default()))
            .expect("insert");
        assert_eq!(a, StudentId(1));
        assert_eq!(b, StudentId(2));
        assert_eq!(store.count().expect("count"), 2);
    }

    #[test]
    fn get_and_all() {
        let store = MemoryStore::new();
        let id = store
            .insert(NewStudent::new("a.png", Averages::new(10.0, 11.0, 12.0)))
            .expect("insert");

        let record = store.get(id).expect("get").expect("present");
        assert_eq!(record.name, "a.png");
        assert!(store.get(StudentId(99)).expect("get").is_none());
        assert_eq!(store.all().expect("all"), vec![record]);
    }

    #[test]
    fn same_name_is_a_new_record() {
        let store = MemoryStore::new();
        store
            .insert(NewStudent::new("same.png", Averages::default()))
            .expect("insert");
        store
            .insert(NewStudent::new("same.png", Averages::default()))
            .expect("insert");
        assert_eq!(store.count().expect("count"), 2);
    }
}
