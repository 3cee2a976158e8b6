//! Command implementations.

use crate::api::{run_server, session_key, AppState, SessionKeyError};
use crate::config::{AppConfig, OcrConfig};
use crate::display::format_average;
use crate::ocr::{ExtractionError, TesseractExtractor, TextExtractor};
use gradebook_core::{
    average_from_text, classify_all, extract_grades, RecordStore, RedbStore, StoreError,
    StudentRecord, Tier,
};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("database already exists at {} (use --force to recreate)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("no database at {} (run `gradebook init` first)", .0.display())]
    NotInitialized(PathBuf),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    SessionKey(#[from] SessionKeyError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create the database (with its table) and the upload directory.
pub fn cmd_init(database: &Path, upload_dir: &Path, force: bool) -> Result<(), CliError> {
    if database.exists() {
        if !force {
            return Err(CliError::AlreadyExists(database.to_path_buf()));
        }
        std::fs::remove_file(database)?;
    }

    RedbStore::open(database)?;
    std::fs::create_dir_all(upload_dir)?;

    info!(database = %database.display(), upload_dir = %upload_dir.display(), "initialised");
    println!("Initialised database at {}", database.display());
    Ok(())
}

/// Open a database created by `init`.
pub fn open_existing_store(database: &Path) -> Result<RedbStore, CliError> {
    if !database.exists() {
        return Err(CliError::NotInitialized(database.to_path_buf()));
    }
    Ok(RedbStore::open(database)?)
}

/// Text (or JSON) listing of records.
pub fn render_list(records: &[StudentRecord], json: bool) -> Result<String, CliError> {
    if json {
        return Ok(serde_json::to_string_pretty(records)?);
    }
    if records.is_empty() {
        return Ok("No students.".to_string());
    }

    let lines: Vec<String> = records
        .iter()
        .map(|record| {
            let [a, b, c] = record.averages.as_array();
            format!(
                "{:>4}  {:<32}  {:>8}  {:>8}  {:>8}",
                record.id.0,
                record.name,
                format_average(a),
                format_average(b),
                format_average(c)
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Text (or JSON) listing of records with their tier.
pub fn render_classify(records: &[StudentRecord], json: bool) -> Result<String, CliError> {
    let rows = classify_all(records);
    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    if rows.is_empty() {
        return Ok("No students.".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let [a, b, c] = row.averages.as_array();
            format!(
                "{:<32}  ({}, {}, {})  {}",
                row.name,
                format_average(a),
                format_average(b),
                format_average(c),
                row.tier
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

pub fn cmd_list(database: &Path, json: bool) -> Result<(), CliError> {
    let store = open_existing_store(database)?;
    println!("{}", render_list(&store.all()?, json)?);
    Ok(())
}

pub fn cmd_classify(database: &Path, json: bool) -> Result<(), CliError> {
    let store = open_existing_store(database)?;
    println!("{}", render_classify(&store.all()?, json)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct GradeReport<'a> {
    file: &'a Path,
    grades: Vec<f64>,
    average: f64,
    tier: Tier,
}

/// OCR one document and print its grades, average and the tier that
/// average would get on its own.
pub fn cmd_grade(file: &Path, ocr: OcrConfig, json: bool) -> Result<(), CliError> {
    let text = TesseractExtractor::new(ocr).extract_text(file)?;
    let average = average_from_text(&text);
    let report = GradeReport {
        file,
        grades: extract_grades(&text),
        average,
        tier: Tier::from_mean(average),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("File:    {}", report.file.display());
        println!("Grades:  {}", report.grades.len());
        println!("Average: {}", format_average(report.average));
        println!("Tier:    {}", report.tier);
    }
    Ok(())
}

/// Open the store, prepare the upload directory and serve.
pub async fn cmd_serve(config: AppConfig) -> Result<(), CliError> {
    let store = RedbStore::open(&config.database)?;
    config.ensure_upload_dir()?;
    let flash_key = session_key(config.secret.as_deref())?;

    let extractor = TesseractExtractor::new(config.ocr.clone());
    extractor.probe();

    info!(
        database = %store.path().display(),
        upload_dir = %config.upload_dir.display(),
        records = store.count()?,
        "starting server"
    );

    let state = AppState::new(config, Arc::new(store), Arc::new(extractor), flash_key);
    run_server(state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::{Averages, NewStudent, StudentId};

    fn records() -> Vec<StudentRecord> {
        vec![
            StudentRecord::from_new(
                StudentId(1),
                NewStudent::new("alice.png", Averages::new(17.0, 15.0, 13.0)),
            ),
            StudentRecord::from_new(
                StudentId(2),
                NewStudent::new("bob.pdf", Averages::new(8.0, 0.0, 10.5)),
            ),
        ]
    }

    #[test]
    fn list_text() {
        let out = render_list(&records(), false).expect("render");
        assert!(out.contains("alice.png"));
        assert!(out.contains("10.5"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn list_empty() {
        assert_eq!(render_list(&[], false).expect("render"), "No students.");
    }

    #[test]
    fn classify_text() {
        let out = render_classify(&records(), false).expect("render");
        assert!(out.contains("(17.0, 15.0, 13.0)  Bien"));
        assert!(out.contains("(8.0, 0.0, 10.5)  Insuffisant"));
    }

    #[test]
    fn classify_json() {
        let out = render_classify(&records(), true).expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value[0]["tier"], "Bien");
        assert_eq!(value[1]["averages"], serde_json::json!([8.0, 0.0, 10.5]));
    }
}
