//! # Gradebook Core
//!
//! The grade engine for Gradebook.
//!
//! This crate is pure and synchronous. It never sees a document, only the
//! text an OCR pass produced from one:
//!
//! ```text
//! text ──► grades::average_from_text ──► Averages ──► RecordStore
//!                                            │
//!                                            └──► tier::classify ──► Tier
//! ```
//!
//! The application crate (`apps/gradebook`) owns OCR, HTTP and the CLI.

pub mod error;
pub mod formats;
pub mod grades;
pub mod storage;
pub mod tier;
pub mod upload;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::StoreError;
pub use grades::{average_from_text, extract_grades, is_grade_token, mean};
pub use storage::{MemoryStore, RecordStore, RedbStore};
pub use tier::{classify, classify_all, ClassifiedStudent, Tier};
pub use upload::{
    allowed_file, secure_filename, validate_filenames, Slot, UploadError, ALLOWED_EXTENSIONS,
};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identity of a stored student record.
///
/// Assigned by the store, starting at 1 and incrementing on every insert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// AVERAGES
// =============================================================================

/// The three per-document averages of a student, in slot order.
///
/// Each value is either the mean of the grade tokens found in that document
/// or exactly `0.0` when none were found.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Averages(pub [f64; 3]);

impl Averages {
    /// Create from the three slot averages.
    #[must_use]
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self([first, second, third])
    }

    /// Average for the given slot.
    #[must_use]
    pub fn get(&self, slot: Slot) -> f64 {
        self.0[slot.index()]
    }

    /// The three values in slot order.
    #[must_use]
    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// Mean of the three averages.
    #[must_use]
    pub fn mean(&self) -> f64 {
        grades::mean(&self.0)
    }
}

impl From<[f64; 3]> for Averages {
    fn from(values: [f64; 3]) -> Self {
        Self(values)
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A student record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Display label, taken from the first uploaded filename.
    pub name: String,
    pub averages: Averages,
}

impl NewStudent {
    /// Create a new unsaved record.
    #[must_use]
    pub fn new(name: impl Into<String>, averages: Averages) -> Self {
        Self {
            name: name.into(),
            averages,
        }
    }
}

/// A persisted student record.
///
/// Records are created once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub averages: Averages,
}

impl StudentRecord {
    /// Attach an identity to an unsaved record.
    #[must_use]
    pub fn from_new(id: StudentId, student: NewStudent) -> Self {
        Self {
            id,
            name: student.name,
            averages: student.averages,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_slot_access() {
        let averages = Averages::new(17.0, 15.0, 13.0);
        assert_eq!(averages.get(Slot::First), 17.0);
        assert_eq!(averages.get(Slot::Second), 15.0);
        assert_eq!(averages.get(Slot::Third), 13.0);
    }

    #[test]
    fn averages_mean() {
        assert_eq!(Averages::new(17.0, 15.0, 13.0).mean(), 15.0);
        assert_eq!(Averages::default().mean(), 0.0);
    }

    #[test]
    fn record_from_new_keeps_fields() {
        let record = StudentRecord::from_new(
            StudentId(7),
            NewStudent::new("alice.png", Averages::new(1.0, 2.0, 3.0)),
        );
        assert_eq!(record.id, StudentId(7));
        assert_eq!(record.name, "alice.png");
        assert_eq!(record.averages.as_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn student_id_display() {
        assert_eq!(StudentId(42).to_string(), "42");
    }
}
