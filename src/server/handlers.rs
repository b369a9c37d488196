use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::error::{malformed_input, PicSyncResult};
use crate::model::{Confidence, EventRecord};
use crate::pipeline::{decode_clipboard_image, ProcessedEvent};

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

/// Body of `POST /api/process-clipboard`
#[derive(Debug, Deserialize)]
pub struct ClipboardRequest {
    pub image: Option<String>,
}

/// Event fields as returned to the page
#[derive(Debug, Serialize, Deserialize)]
pub struct EventView {
    pub title: Option<String>,
    pub date: Option<String>,
    /// Same as `start_time`, kept for older clients
    pub time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timezone: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub duration: String,
    pub confidence: Option<Confidence>,
}

impl From<&EventRecord> for EventView {
    fn from(event: &EventRecord) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            time: event.start_time.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            timezone: event.timezone.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            duration: event.duration_or_default().to_string(),
            confidence: event.confidence,
        }
    }
}

/// Successful response of both processing endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub extracted_text: String,
    pub event: EventView,
    pub calendar_url: String,
}

impl From<ProcessedEvent> for ProcessResponse {
    fn from(processed: ProcessedEvent) -> Self {
        Self {
            success: true,
            event: EventView::from(&processed.event),
            extracted_text: processed.extracted_text,
            calendar_url: processed.calendar_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub vision_api: bool,
    pub ai_refiner: bool,
}

/// Handler for the index page
pub async fn index_handler() -> impl IntoResponse {
    Html(include_str!("../../static/index.html"))
}

/// Handler for API health check
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        vision_api: state.pipeline.ocr_available(),
        ai_refiner: state.pipeline.refiner_available(),
    })
}

/// Handler for image uploads
pub async fn process_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PicSyncResult<Json<ProcessResponse>> {
    let mut multipart = multipart.map_err(|rejection| malformed_input(&rejection.body_text()))?;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed_input(&format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| malformed_input(&format!("Failed to read upload: {}", e)))?;
            image = Some(data);
        }
    }

    let image = image.ok_or_else(|| malformed_input("No file uploaded"))?;
    info!("Processing uploaded image of {} bytes", image.len());

    let processed = state.pipeline.process_image(&image).await?;
    Ok(Json(processed.into()))
}

/// Handler for base64 images pasted from the clipboard
pub async fn process_clipboard_handler(
    State(state): State<AppState>,
    request: Result<Json<ClipboardRequest>, JsonRejection>,
) -> PicSyncResult<Json<ProcessResponse>> {
    let Json(request) = request.map_err(|rejection| malformed_input(&rejection.body_text()))?;
    let image = decode_clipboard_image(request.image.as_deref())?;
    info!("Processing pasted image of {} bytes", image.len());

    let processed = state.pipeline.process_image(&image).await?;
    Ok(Json(processed.into()))
}
