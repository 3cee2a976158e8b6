//! # Upload Workflow
//!
//! validate → save → extract → parse → persist, for one three-document upload.
//!
//! Validation happens before any side effect. Once files are saved they stay
//! on disk, even if a later step fails; only the record is all-or-nothing.

use crate::config::AppConfig;
use crate::display::format_averages;
use crate::ocr::{ExtractionError, TextExtractor};
use gradebook_core::{
    average_from_text, secure_filename, validate_filenames, Averages, NewStudent, RecordStore,
    Slot, StoreError, StudentId, UploadError,
};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// A file received for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename as sent by the client, before sanitisation.
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// The three slots of an upload, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    slots: [Option<UploadedFile>; 3],
}

impl UploadRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`UploadRequest::set`].
    #[must_use]
    pub fn with(mut self, slot: Slot, file: UploadedFile) -> Self {
        self.set(slot, file);
        self
    }

    /// Fill a slot. A later file for the same slot replaces the earlier one.
    pub fn set(&mut self, slot: Slot, file: UploadedFile) {
        self.slots[slot.index()] = Some(file);
    }

    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&UploadedFile> {
        self.slots[slot.index()].as_ref()
    }
}

/// A successfully processed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub id: StudentId,
    pub name: String,
    pub averages: Averages,
    pub saved: Vec<PathBuf>,
}

impl UploadOutcome {
    /// Message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Files uploaded and averages calculated: {}",
            format_averages(&self.averages)
        )
    }
}

/// Why an upload did not produce a record.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Invalid(#[from] UploadError),

    #[error("could not save {}: {source}", path.display())]
    Save { path: PathBuf, source: io::Error },

    #[error("Error during text extraction of {} ({filename}): {source}", slot.field_name())]
    Extraction {
        slot: Slot,
        filename: String,
        source: ExtractionError,
    },

    #[error("could not store the record: {0}")]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Invalid(err) => err.to_string(),
            other => format!("An error occurred during processing: {other}"),
        }
    }

    /// `true` when the request was rejected before anything was written.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Invalid(_))
    }
}

/// Runs an upload against an injected extractor and store.
pub struct UploadWorkflow<'a> {
    config: &'a AppConfig,
    extractor: &'a dyn TextExtractor,
    store: &'a dyn RecordStore,
}

impl<'a> UploadWorkflow<'a> {
    #[must_use]
    pub fn new(
        config: &'a AppConfig,
        extractor: &'a dyn TextExtractor,
        store: &'a dyn RecordStore,
    ) -> Self {
        Self {
            config,
            extractor,
            store,
        }
    }

    /// Process one upload to completion.
    pub fn run(&self, request: &UploadRequest) -> Result<UploadOutcome, WorkflowError> {
        let filenames = Slot::ALL.map(|slot| request.get(slot).map(|f| f.filename.as_str()));
        validate_filenames(filenames)?;

        let secure_names = Slot::ALL.map(|slot| {
            request
                .get(slot)
                .map(|f| secure_filename(&f.filename))
                .unwrap_or_default()
        });
        if secure_names.iter().any(String::is_empty) {
            return Err(UploadError::NotSelected.into());
        }

        info!(files = ?secure_names, "processing upload");

        let mut saved = Vec::with_capacity(Slot::ALL.len());
        for slot in Slot::ALL {
            let Some(file) = request.get(slot) else {
                return Err(UploadError::MissingFile.into());
            };
            let path = self.config.upload_path(&secure_names[slot.index()]);
            std::fs::write(&path, &file.data).map_err(|source| {
                error!(path = %path.display(), error = %source, "failed to save upload");
                WorkflowError::Save {
                    path: path.clone(),
                    source,
                }
            })?;
            saved.push(path);
        }

        let mut averages = Averages::default();
        for (slot, path) in Slot::ALL.into_iter().zip(&saved) {
            let text = self.extractor.extract_text(path).map_err(|source| {
                error!(slot = slot.field_name(), error = %source, "text extraction failed");
                WorkflowError::Extraction {
                    slot,
                    filename: secure_names[slot.index()].clone(),
                    source,
                }
            })?;
            averages.0[slot.index()] = average_from_text(&text);
        }

        let [name, _, _] = secure_names;
        let id = self
            .store
            .insert(NewStudent::new(name.clone(), averages))
            .inspect_err(|err| error!(error = %err, "failed to store record"))?;

        let outcome = UploadOutcome {
            id,
            name,
            averages,
            saved,
        };
        info!(id = %outcome.id, name = %outcome.name, "{}", outcome.message());
        Ok(outcome)
    }
}
