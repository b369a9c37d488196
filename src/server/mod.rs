//! HTTP surface: upload and clipboard endpoints plus the static page.

mod handlers;

pub use handlers::{ClipboardRequest, EventView, HealthResponse, ProcessResponse};

use crate::error::Error;
use crate::pipeline::EventPipeline;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, warn};

use handlers::{health_handler, index_handler, process_clipboard_handler, process_image_handler};

#[derive(Clone)]
pub struct AppState {
    /// Shared, read-only event pipeline
    pub pipeline: Arc<EventPipeline>,
}

/// Build the router with all routes and middlewares
pub fn router(state: AppState, static_dir: &str, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/process-image", post(process_image_handler))
        .route("/api/process-clipboard", post(process_clipboard_handler))
        // Serve static files
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NoTextFound | Error::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.kind(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
