//! # Text Extractor
//!
//! Turns a stored document into text with an external OCR program.
//!
//! Images are passed straight to `tesseract`. PDFs are rasterised with
//! `pdftoppm` first and every page is OCR'd in order. One attempt, no retry,
//! no timeout.

use crate::config::OcrConfig;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from a [`TextExtractor`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} failed on {}: {stderr}", path.display())]
    Failed {
        program: String,
        path: PathBuf,
        stderr: String,
    },

    #[error("{program} produced no pages for {}", path.display())]
    NoPages { program: String, path: PathBuf },

    #[error("I/O error during extraction: {0}")]
    Io(#[from] io::Error),
}

/// Something that can read the text out of a stored document.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// [`TextExtractor`] backed by the `tesseract` and `pdftoppm` programs.
#[derive(Debug, Clone, Default)]
pub struct TesseractExtractor {
    config: OcrConfig,
}

impl TesseractExtractor {
    #[must_use]
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Check that the OCR programs can be started. Only logs; a missing
    /// program surfaces later as an [`ExtractionError`] on upload.
    pub fn probe(&self) -> bool {
        let tesseract = Command::new(&self.config.tesseract)
            .arg("--version")
            .output()
            .is_ok();
        let pdftoppm = Command::new(&self.config.pdftoppm)
            .arg("-v")
            .output()
            .is_ok();

        if !tesseract {
            warn!(program = %self.config.tesseract, "tesseract not found, OCR uploads will fail");
        }
        if !pdftoppm {
            warn!(program = %self.config.pdftoppm, "pdftoppm not found, PDF uploads will fail");
        }
        tesseract && pdftoppm
    }

    fn ocr_image(&self, image: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.config.tesseract)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: self.config.tesseract.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Failed {
                program: self.config.tesseract.clone(),
                path: image.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn ocr_pdf(&self, pdf: &Path) -> Result<String, ExtractionError> {
        let pages_dir = tempfile::tempdir()?;
        let prefix = pages_dir.path().join("page");

        let output = Command::new(&self.config.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: self.config.pdftoppm.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Failed {
                program: self.config.pdftoppm.clone(),
                path: pdf.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // pdftoppm zero-pads page numbers, so name order is page order.
        let mut pages: Vec<PathBuf> = std::fs::read_dir(pages_dir.path())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        if pages.is_empty() {
            return Err(ExtractionError::NoPages {
                program: self.config.pdftoppm.clone(),
                path: pdf.to_path_buf(),
            });
        }

        debug!(pdf = %pdf.display(), pages = pages.len(), "rasterised PDF");

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            texts.push(self.ocr_image(page)?);
        }
        Ok(texts.join("\n"))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl TextExtractor for TesseractExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        std::fs::File::open(path).map_err(|source| ExtractionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let text = if is_pdf(path) {
            self.ocr_pdf(path)?
        } else {
            self.ocr_image(path)?
        };

        info!(path = %path.display(), chars = text.len(), "OCR complete");
        Ok(text)
    }
}
