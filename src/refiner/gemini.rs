use super::Generator;
use crate::config::Config;
use crate::error::{upstream_error, PicSyncResult};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

const SYSTEM_PROMPT: &str = "You turn text read from screenshots into calendar events. You answer with a single JSON object and never add explanations or Markdown.";

/// Google Gemini through Rig
pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.to_string(),
        }
    }

    /// Build from config; `None` when no API key is set
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.gemini_api_key.as_deref()?;
        info!("Using Gemini model: {}", config.gemini_model);
        Some(Self::new(api_key, &config.gemini_model))
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> PicSyncResult<String> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PROMPT)
            .temperature(0.1)
            .build();

        let response = agent
            .chat(prompt.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| upstream_error(&format!("Gemini request failed: {}", e)))?;

        info!("Received response from Gemini");
        Ok(response)
    }
}
