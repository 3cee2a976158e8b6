//! # Classifier
//!
//! Maps a student's three averages to one of four performance tiers.
//!
//! Thresholds are inclusive lower bounds on the mean of the three averages:
//!
//! | Mean            | Tier          |
//! |-----------------|---------------|
//! | `>= 16`         | Excellent     |
//! | `14 ..< 16`     | Bien          |
//! | `12 ..< 14`     | Passable      |
//! | `< 12`          | Insuffisant   |
//!
//! Tiers are computed on read and never stored.

use crate::{Averages, StudentRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of [`Tier::Excellent`].
pub const EXCELLENT_THRESHOLD: f64 = 16.0;

/// Lower bound (inclusive) of [`Tier::Bien`].
pub const BIEN_THRESHOLD: f64 = 14.0;

/// Lower bound (inclusive) of [`Tier::Passable`].
pub const PASSABLE_THRESHOLD: f64 = 12.0;

/// Performance tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Insuffisant,
    Passable,
    Bien,
    Excellent,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Insuffisant, Tier::Passable, Tier::Bien, Tier::Excellent];

    /// Tier for an already-computed mean.
    ///
    /// Total over `f64`: anything that is not at least 12 (including NaN)
    /// is `Insuffisant`.
    #[must_use]
    pub fn from_mean(mean: f64) -> Self {
        if mean >= EXCELLENT_THRESHOLD {
            Tier::Excellent
        } else if mean >= BIEN_THRESHOLD {
            Tier::Bien
        } else if mean >= PASSABLE_THRESHOLD {
            Tier::Passable
        } else {
            Tier::Insuffisant
        }
    }

    /// The label shown to users.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Bien => "Bien",
            Tier::Passable => "Passable",
            Tier::Insuffisant => "Insuffisant",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a triple of averages by their mean.
#[must_use]
pub fn classify(averages: &Averages) -> Tier {
    Tier::from_mean(averages.mean())
}

/// A record paired with its tier, as shown on the classification page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedStudent {
    pub name: String,
    pub averages: Averages,
    pub tier: Tier,
}

impl ClassifiedStudent {
    /// Classify a stored record.
    #[must_use]
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            averages: record.averages,
            tier: classify(&record.averages),
        }
    }
}

/// Classify every record, preserving order.
#[must_use]
pub fn classify_all(records: &[StudentRecord]) -> Vec<ClassifiedStudent> {
    records.iter().map(ClassifiedStudent::from_record).collect()
}

// =============================================================================
// TESTS
// =============================================================================
