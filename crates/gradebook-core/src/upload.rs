//! # Upload Slots
//!
//! Validation rules for the three-document upload.
//!
//! Everything here runs before any side effect: a request that fails
//! [`validate_filenames`] must leave the upload directory and the store
//! untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for uploaded documents (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "pdf", "png"];

/// One of the three fixed upload positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    /// All slots in order.
    pub const ALL: [Slot; 3] = [Slot::First, Slot::Second, Slot::Third];

    /// Multipart field name of this slot.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Slot::First => "file1",
            Slot::Second => "file2",
            Slot::Third => "file3",
        }
    }

    /// Slot for a multipart field name.
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }

    /// Zero-based position.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
            Slot::Third => 2,
        }
    }
}

/// Reasons an upload is rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Some files were not uploaded")]
    MissingFile,

    #[error("Some files were not selected")]
    NotSelected,

    #[error("File type not allowed for '{filename}' (allowed: {})", ALLOWED_EXTENSIONS.join(", "))]
    DisallowedExtension { filename: String },
}

/// Lowercased text after the last `.`, if any.
fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Check that `filename` has an allowed extension.
#[must_use]
pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Validate the client-supplied filenames of the three slots.
///
/// Checks run in order: every slot present, every filename non-empty, every
/// extension allowed. The first failing check decides the error.
pub fn validate_filenames(filenames: [Option<&str>; 3]) -> Result<[&str; 3], UploadError> {
    let [Some(first), Some(second), Some(third)] = filenames else {
        return Err(UploadError::MissingFile);
    };
    let names = [first, second, third];

    if names.iter().any(|name| name.is_empty()) {
        return Err(UploadError::NotSelected);
    }

    if let Some(bad) = names.iter().find(|name| !allowed_file(name)) {
        return Err(UploadError::DisallowedExtension {
            filename: (*bad).to_string(),
        });
    }

    Ok(names)
}

/// Reduce a client-supplied filename to something safe to join onto the
/// upload directory.
///
/// The name is NFKD-normalised and folded to ASCII (`relevé` becomes
/// `releve`), `/` separators and whitespace runs become a single `_`, and
/// anything outside `[A-Za-z0-9._-]` is removed. Leading and trailing `.`/`_`
/// are trimmed so the result can never be `..` or a hidden file. The result
/// may be empty.
#[must_use]
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' { ' ' } else { c })
        .collect();

    let cleaned: String = ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

// =============================================================================
// TESTS
// =============================================================================
