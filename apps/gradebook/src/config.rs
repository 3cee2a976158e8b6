//! # Configuration
//!
//! Explicit runtime configuration, built once from the CLI and handed to the
//! server and the upload workflow. Nothing here is global.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default database file.
pub const DEFAULT_DATABASE: &str = "students.redb";

/// Default upload directory.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default request body limit for uploads, in MiB.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

/// Settings for the external OCR programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// `tesseract` executable.
    pub tesseract: String,
    /// `pdftoppm` executable (poppler-utils), used to rasterise PDFs.
    pub pdftoppm: String,
    /// Tesseract language code.
    pub language: String,
    /// Resolution used when rasterising PDF pages.
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract: "tesseract".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            language: "eng".to_string(),
            dpi: 300,
        }
    }
}

/// Application configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: PathBuf,
    pub upload_dir: PathBuf,
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
    pub ocr: OcrConfig,
    /// Secret the flash cookie signing key is built from. `None` means a
    /// random key per process.
    pub secret: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database", &self.database)
            .field("upload_dir", &self.upload_dir)
            .field("bind", &self.bind)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("ocr", &self.ocr)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE, DEFAULT_UPLOAD_DIR)
    }
}

impl AppConfig {
    /// Configuration with default server and OCR settings.
    #[must_use]
    pub fn new(database: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            upload_dir: upload_dir.into(),
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            ocr: OcrConfig::default(),
            secret: None,
        }
    }

    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    #[must_use]
    pub fn with_max_upload_mb(mut self, megabytes: usize) -> Self {
        self.max_upload_bytes = megabytes.saturating_mul(1024 * 1024);
        self
    }

    #[must_use]
    pub fn with_ocr(mut self, ocr: OcrConfig) -> Self {
        self.ocr = ocr;
        self
    }

    #[must_use]
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }

    /// Destination of an uploaded file with an already sanitised name.
    #[must_use]
    pub fn upload_path(&self, secure_name: &str) -> PathBuf {
        self.upload_dir.join(secure_name)
    }

    /// Create the upload directory if it does not exist yet.
    pub fn ensure_upload_dir(&self) -> io::Result<&Path> {
        std::fs::create_dir_all(&self.upload_dir)?;
        Ok(&self.upload_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database, PathBuf::from("students.redb"));
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.bind.port(), 5000);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.secret, None);
    }

    #[test]
    fn debug_hides_secret() {
        let config = AppConfig::default().with_secret(Some("hunter2".repeat(10)));
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn upload_path_joins_dir() {
        let config = AppConfig::new("db.redb", "/srv/uploads");
        assert_eq!(
            config.upload_path("scan.png"),
            PathBuf::from("/srv/uploads/scan.png")
        );
    }

    #[test]
    fn ensure_upload_dir_creates_nested() {
        let temp = tempfile::tempdir().expect("temp dir");
        let config = AppConfig::new(temp.path().join("db.redb"), temp.path().join("a/b"));
        let dir = config.ensure_upload_dir().expect("create");
        assert!(dir.is_dir());
    }
}
