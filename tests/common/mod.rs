//! Test doubles for the OCR and model seams.

#![allow(dead_code)]

use async_trait::async_trait;
use picsync::error::{upstream_error, PicSyncResult};
use picsync::ocr::OcrClient;
use picsync::refiner::Generator;
use picsync::EventPipeline;
use std::sync::Arc;
use std::time::Duration;

/// OCR that returns fixed text for any image
pub struct MockOcr {
    text: String,
}

impl MockOcr {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl OcrClient for MockOcr {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn detect_text(&self, _image: &[u8]) -> PicSyncResult<String> {
        Ok(self.text.clone())
    }
}

/// Model that replies with a canned string, or fails
pub enum MockGenerator {
    Reply(String),
    Fail,
}

impl MockGenerator {
    pub fn reply(reply: &str) -> Self {
        Self::Reply(reply.to_string())
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, _prompt: &str) -> PicSyncResult<String> {
        match self {
            Self::Reply(reply) => Ok(reply.clone()),
            Self::Fail => Err(upstream_error("model unavailable")),
        }
    }
}

pub const MEETING_TEXT: &str = "Team Meeting\nDate: 10/03/2025\nTime: 2:30 PM\nRoom: 204";

/// Pipeline around the given doubles
pub fn pipeline(ocr: Option<MockOcr>, generator: Option<MockGenerator>) -> EventPipeline {
    EventPipeline::new(
        ocr.map(|o| Arc::new(o) as Arc<dyn OcrClient>),
        generator.map(|g| Arc::new(g) as Arc<dyn Generator>),
        "UTC",
        Duration::from_secs(2),
    )
}
