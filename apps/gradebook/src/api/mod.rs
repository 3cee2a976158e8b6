//! # HTTP API
//!
//! axum router for the upload form, the record list and the classification
//! page, plus JSON endpoints.
//!
//! | Method | Path                   | Response                               |
//! |--------|------------------------|----------------------------------------|
//! | GET    | `/`                    | HTML: upload form, flash, records      |
//! | POST   | `/upload`              | 303 to `/`, flash message in a cookie  |
//! | GET    | `/classification`      | HTML: records with their tier          |
//! | GET    | `/health`              | JSON status and record count           |
//! | GET    | `/api/records`         | JSON records                           |
//! | GET    | `/api/records/{id}`    | JSON record, 404 if absent             |
//! | GET    | `/api/classification`  | JSON records with their tier           |
//!
//! Store access and the upload workflow are synchronous; handlers run them on
//! tokio's blocking pool.

mod flash;
mod handlers;
mod pages;

pub use flash::{session_key, Flash, FlashLevel, SessionKeyError, FLASH_COOKIE, MIN_SECRET_BYTES};
pub use handlers::HealthResponse;
pub use pages::{render_classification, render_index};

use crate::config::AppConfig;
use crate::ocr::TextExtractor;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::Key;
use gradebook_core::{RecordStore, StoreError, StudentId};
use std::sync::Arc;
use tokio::task::JoinError;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub extractor: Arc<dyn TextExtractor>,
    flash_key: Key,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        extractor: Arc<dyn TextExtractor>,
        flash_key: Key,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            extractor,
            flash_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.flash_key.clone()
    }
}

/// Errors a read handler can hit.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    Blocking(JoinError),
    NotFound(StudentId),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Blocking(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Store(err) => {
                error!(error = %err, "record store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "record store unavailable".to_string())
            }
            ApiError::Blocking(err) => {
                error!(error = %err, "store task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "record store unavailable".to_string())
            }
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("no record with id {id}")),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/classification", get(handlers::classification))
        .route("/health", get(handlers::health))
        .route("/api/records", get(handlers::api_records))
        .route("/api/records/{id}", get(handlers::api_record))
        .route("/api/classification", get(handlers::api_classification))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to install Ctrl-C handler");
            }
            info!("shutting down");
        })
        .await
}
