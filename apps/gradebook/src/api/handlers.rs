//! HTTP request handlers.

use super::flash::Flash;
use super::pages::{render_classification, render_index};
use super::{ApiError, AppState};
use crate::workflow::{UploadRequest, UploadWorkflow, UploadedFile};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use gradebook_core::{
    classify_all, ClassifiedStudent, RecordStore, Slot, StoreError, StudentId, StudentRecord,
};
use serde::Serialize;
use tracing::{error, warn};

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: u64,
}

/// Run a store read on the blocking pool.
async fn read_store<T, F>(state: &AppState, read: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn RecordStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = state.store.clone();
    Ok(tokio::task::spawn_blocking(move || read(store.as_ref())).await??)
}

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), ApiError> {
    let records = read_store(&state, |store| store.all()).await?;
    let (jar, flash) = Flash::take(jar);
    Ok((jar, Html(render_index(&records, flash.as_ref()))))
}

pub async fn classification(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let records = read_store(&state, |store| store.all()).await?;
    Ok(Html(render_classification(&classify_all(&records))))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        records: read_store(&state, |store| store.count()).await?,
    }))
}

pub async fn api_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentRecord>>, ApiError> {
    Ok(Json(read_store(&state, |store| store.all()).await?))
}

pub async fn api_record(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StudentRecord>, ApiError> {
    let id = StudentId(id);
    read_store(&state, move |store| store.get(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub async fn api_classification(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassifiedStudent>>, ApiError> {
    let records = read_store(&state, |store| store.all()).await?;
    Ok(Json(classify_all(&records)))
}

/// Collect the `file1`..`file3` parts. Parts without a filename are form
/// fields, not files, and are ignored like any unknown field.
async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, MultipartError> {
    let mut request = UploadRequest::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(slot) = field.name().and_then(Slot::from_field_name) else {
            continue;
        };
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let data = field.bytes().await?;
        request.set(slot, UploadedFile::new(filename, data.to_vec()));
    }
    Ok(request)
}

/// `POST /upload`: always answers with a redirect to `/`, leaving a flash
/// message for the next page view.
pub async fn upload(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> (SignedCookieJar, Redirect) {
    let flash = match process_upload(state, multipart).await {
        Ok(message) => Flash::success(message),
        Err(message) => Flash::error(message),
    };
    (flash.store(jar), Redirect::to("/"))
}

async fn process_upload(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, String> {
    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "rejected upload body");
        "Some files were not uploaded".to_string()
    })?;

    let request = read_upload(multipart).await.map_err(|err| {
        warn!(error = %err, "malformed multipart upload");
        format!("An error occurred during processing: {err}")
    })?;

    let joined = tokio::task::spawn_blocking(move || {
        UploadWorkflow::new(&state.config, state.extractor.as_ref(), state.store.as_ref())
            .run(&request)
    })
    .await;

    match joined {
        Ok(Ok(outcome)) => Ok(outcome.message()),
        Ok(Err(err)) => {
            if err.is_validation() {
                warn!(error = %err, "upload rejected");
            }
            Err(err.user_message())
        }
        Err(join_err) => {
            error!(error = %join_err, "upload task failed");
            Err(format!("An error occurred during processing: {join_err}"))
        }
    }
}
