//! Versioned binary encoding of a record body.
//!
//! Layout: one version byte followed by a postcard payload. The record id is
//! the table key and is not part of the body.

use crate::{Averages, NewStudent, StoreError, StudentId, StudentRecord};
use serde::{Deserialize, Serialize};

/// Current record body version.
pub const RECORD_FORMAT_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct RecordBodyV1 {
    name: String,
    averages: [f64; 3],
}

/// Encode the body of a record.
pub fn encode_record(student: &NewStudent) -> Result<Vec<u8>, StoreError> {
    let body = RecordBodyV1 {
        name: student.name.clone(),
        averages: student.averages.as_array(),
    };
    let payload = postcard::to_allocvec(&body)?;

    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(RECORD_FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a record body stored under `id`.
pub fn decode_record(id: StudentId, bytes: &[u8]) -> Result<StudentRecord, StoreError> {
    let (&version, payload) = bytes.split_first().ok_or(StoreError::EmptyRecord)?;
    if version != RECORD_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }

    let body: RecordBodyV1 = postcard::from_bytes(payload)?;
    Ok(StudentRecord {
        id,
        name: body.name,
        averages: Averages(body.averages),
    })
}
