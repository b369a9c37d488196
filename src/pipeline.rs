use crate::calendar::build_url;
use crate::error::{malformed_input, Error, PicSyncResult};
use crate::extractor::extract;
use crate::model::EventRecord;
use crate::ocr::OcrClient;
use crate::refiner::{refine, Generator, RefineOptions};
use base64::engine::{general_purpose::STANDARD, Engine};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Result of turning one image (or text) into an invite
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedEvent {
    pub extracted_text: String,
    pub event: EventRecord,
    pub calendar_url: String,
}

/// Image → text → draft → refined record → calendar URL.
///
/// Holds read-only handles to the collaborators; each call is independent.
#[derive(Clone)]
pub struct EventPipeline {
    ocr: Option<Arc<dyn OcrClient>>,
    generator: Option<Arc<dyn Generator>>,
    default_timezone: String,
    timeout: Duration,
}

impl EventPipeline {
    pub fn new(
        ocr: Option<Arc<dyn OcrClient>>,
        generator: Option<Arc<dyn Generator>>,
        default_timezone: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            ocr,
            generator,
            default_timezone: default_timezone.to_string(),
            timeout,
        }
    }

    /// Whether an OCR client was initialized
    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }

    /// Whether a generative model is configured
    pub fn refiner_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Run OCR on the image and build an event from the text
    pub async fn process_image(&self, image: &[u8]) -> PicSyncResult<ProcessedEvent> {
        let ocr = self
            .ocr
            .as_ref()
            .ok_or_else(|| Error::ServiceUnavailable("Vision API not available".to_string()))?;

        if image.is_empty() {
            return Err(malformed_input("Image is empty"));
        }

        info!("Running {} on image of {} bytes", ocr.name(), image.len());
        let text = ocr.detect_text(image).await?;

        if text.trim().is_empty() {
            return Err(Error::NoTextFound);
        }

        Ok(self.process_text(&text).await)
    }

    /// Build an event from already extracted text
    pub async fn process_text(&self, text: &str) -> ProcessedEvent {
        let draft = extract(text);
        let options = RefineOptions::for_today(&self.default_timezone, self.timeout);
        let event = refine(self.generator.as_deref(), text, &draft, &options).await;
        let calendar_url = build_url(&event);

        info!(
            "Built event {:?} on {:?}",
            event.title.as_deref().unwrap_or(""),
            event.date.as_deref().unwrap_or("")
        );

        ProcessedEvent {
            extracted_text: text.to_string(),
            event,
            calendar_url,
        }
    }
}

/// Decode a pasted image, with or without a `data:image/...;base64,` prefix
pub fn decode_clipboard_image(payload: Option<&str>) -> PicSyncResult<Vec<u8>> {
    let payload = payload
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| malformed_input("No image data provided"))?;

    // Remove data URL prefix if present
    let encoded = payload.split_once(',').map_or(payload, |(_, data)| data);
    let encoded: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| malformed_input(&format!("Invalid base64 image data: {}", e)))?;

    if bytes.is_empty() {
        return Err(malformed_input("No image data provided"));
    }
    Ok(bytes)
}
