use super::OcrClient;
use crate::config::Config;
use crate::error::{upstream_error, PicSyncResult};
use async_trait::async_trait;
use base64::engine::{general_purpose::STANDARD, Engine};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    /// Base64 encoded image bytes
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response body of `images:annotate`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    full_text_annotation: Option<FullTextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct FullTextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// Google Cloud Vision text detection over REST
pub struct VisionClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl VisionClient {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> PicSyncResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build from config; `Ok(None)` when no API key is set
    pub fn from_config(config: &Config) -> PicSyncResult<Option<Self>> {
        let Some(api_key) = config.vision_api_key.as_deref() else {
            return Ok(None);
        };
        info!("Using Vision endpoint: {}", config.vision_endpoint);
        Self::new(api_key, &config.vision_endpoint, config.upstream_timeout()).map(Some)
    }
}

#[async_trait]
impl OcrClient for VisionClient {
    fn name(&self) -> &str {
        "google-vision"
    }

    async fn detect_text(&self, image: &[u8]) -> PicSyncResult<String> {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let res = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| upstream_error(&format!("Failed to send request to Vision API: {e}")))?;

        // Check if request was successful
        if !res.status().is_success() {
            let status = res.status();
            let error_body = res.text().await.unwrap_or_default();
            return Err(upstream_error(&format!(
                "Vision API returned error: Status {status}, Body: {error_body}"
            )));
        }

        let response: AnnotateResponse = res
            .json()
            .await
            .map_err(|e| upstream_error(&format!("Failed to parse Vision response: {e}")))?;

        text_from_response(response)
    }
}

/// Pull the detected text out of an annotate response.
/// An error reported by the API is surfaced, no annotations mean no text.
pub(crate) fn text_from_response(response: AnnotateResponse) -> PicSyncResult<String> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(String::new());
    };

    if let Some(status) = first.error.filter(|s| !s.message.is_empty()) {
        return Err(upstream_error(&format!(
            "Vision API error ({}): {}",
            status.code, status.message
        )));
    }

    let text = first
        .text_annotations
        .into_iter()
        .next()
        .map(|a| a.description)
        .filter(|t| !t.trim().is_empty())
        .or_else(|| first.full_text_annotation.map(|f| f.text))
        .unwrap_or_default();

    debug!("Vision detected {} characters", text.len());
    Ok(text)
}
