//! # Formats Module
//!
//! On-disk encoding of student records.
//!
//! This module only handles format conversion (pure transformations).
//! Reading and writing the database lives in [`crate::storage`].

mod record;

pub use record::*;
