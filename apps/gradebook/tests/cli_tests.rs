//! Integration tests for Gradebook CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use gradebook::cli::{
    cmd_classify, cmd_grade, cmd_init, cmd_list, cmd_serve, open_existing_store, CliError,
};
use gradebook::config::{AppConfig, OcrConfig};
use gradebook_core::{Averages, NewStudent, RecordStore, StudentId};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn paths(temp: &TempDir) -> (PathBuf, PathBuf) {
    (
        temp.path().join("students.redb"),
        temp.path().join("uploads"),
    )
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_init_creates_database_and_upload_dir() {
    let temp = create_temp_dir();
    let (db, uploads) = paths(&temp);

    cmd_init(&db, &uploads, false).unwrap();
    assert!(db.exists());
    assert!(uploads.is_dir());

    let store = open_existing_store(&db).unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_init_fails_if_exists_without_force() {
    let temp = create_temp_dir();
    let (db, uploads) = paths(&temp);

    cmd_init(&db, &uploads, false).unwrap();
    let result = cmd_init(&db, &uploads, false);
    assert!(matches!(result, Err(CliError::AlreadyExists(_))));
}

#[test]
fn test_init_with_force_recreates_empty() {
    let temp = create_temp_dir();
    let (db, uploads) = paths(&temp);

    cmd_init(&db, &uploads, false).unwrap();
    {
        let store = open_existing_store(&db).unwrap();
        store
            .insert(NewStudent::new("a.png", Averages::new(10.0, 10.0, 10.0)))
            .unwrap();
    }

    cmd_init(&db, &uploads, true).unwrap();
    let store = open_existing_store(&db).unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

// =============================================================================
// LIST / CLASSIFY COMMAND TESTS
// =============================================================================

#[test]
fn test_list_requires_init() {
    let temp = create_temp_dir();
    let (db, _) = paths(&temp);

    let result = cmd_list(&db, false);
    assert!(matches!(result, Err(CliError::NotInitialized(_))));
    assert!(!db.exists());
}

#[test]
fn test_list_and_classify_after_insert() {
    let temp = create_temp_dir();
    let (db, uploads) = paths(&temp);
    cmd_init(&db, &uploads, false).unwrap();

    {
        let store = open_existing_store(&db).unwrap();
        let id = store
            .insert(NewStudent::new("alice.png", Averages::new(17.0, 15.0, 13.0)))
            .unwrap();
        assert_eq!(id, StudentId(1));
    }

    assert!(cmd_list(&db, false).is_ok());
    assert!(cmd_list(&db, true).is_ok());
    assert!(cmd_classify(&db, false).is_ok());
    assert!(cmd_classify(&db, true).is_ok());
}

// =============================================================================
// GRADE COMMAND TESTS
// =============================================================================

#[test]
fn test_grade_missing_file() {
    let temp = create_temp_dir();
    let missing = temp.path().join("absent.png");

    let result = cmd_grade(&missing, OcrConfig::default(), false);
    assert!(matches!(result, Err(CliError::Extraction(_))));
}

#[test]
fn test_grade_without_ocr_program() {
    let temp = create_temp_dir();
    let image = temp.path().join("scan.png");
    std::fs::write(&image, b"fake").unwrap();

    let ocr = OcrConfig {
        tesseract: "gradebook-test-missing-tesseract".to_string(),
        ..OcrConfig::default()
    };
    let result = cmd_grade(&image, ocr, true);
    assert!(matches!(result, Err(CliError::Extraction(_))));
}

// =============================================================================
// SERVE COMMAND TESTS
// =============================================================================

#[tokio::test]
async fn test_serve_rejects_short_secret() {
    let temp = create_temp_dir();
    let (db, uploads) = paths(&temp);

    let config = AppConfig::new(&db, &uploads).with_secret(Some("too-short".to_string()));
    let result = cmd_serve(config).await;
    assert!(matches!(result, Err(CliError::SessionKey(_))));
}
