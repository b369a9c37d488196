//! Optional generative refinement of the deterministic draft.
//!
//! The refiner never fails: without a configured model, on a network error or
//! on an unusable reply it hands back the draft unchanged.

#[cfg(feature = "gemini")]
mod gemini;
mod reply;

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;
pub use reply::{parse_reply, strip_code_fence, AiReply};

use crate::error::{upstream_error, PicSyncResult};
use crate::model::EventRecord;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use schemars::schema_for;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Text-in/text-out language model
#[async_trait]
pub trait Generator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Send the prompt and return the raw reply text
    async fn generate(&self, prompt: &str) -> PicSyncResult<String>;
}

/// Per-request settings for a refinement
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Anchor for relative dates like "next Friday"
    pub today: NaiveDate,
    /// Zone the model should assume when the text names none
    pub default_timezone: String,
    /// Upper bound for the model call
    pub timeout: Duration,
}

impl RefineOptions {
    /// Options anchored on the current date in the default zone
    pub fn for_today(default_timezone: &str, timeout: Duration) -> Self {
        Self::at(Utc::now(), default_timezone, timeout)
    }

    /// Options anchored on the date `now` falls on in the default zone.
    /// An unknown zone name anchors on the UTC date.
    pub fn at(now: DateTime<Utc>, default_timezone: &str, timeout: Duration) -> Self {
        let today = match default_timezone.parse::<Tz>() {
            Ok(tz) => now.with_timezone(&tz).date_naive(),
            Err(_) => now.date_naive(),
        };

        Self {
            today,
            default_timezone: default_timezone.to_string(),
            timeout,
        }
    }
}

const PROMPT_TEMPLATE: &str = "Extract one calendar event from the text below. The text was read from a screenshot with OCR and may contain email headers, chat noise or broken lines.

Today's date is {today}. Resolve relative dates such as \"tomorrow\" or \"next Friday\" against it and write dates as MM/DD/YYYY.
Write times the way a clock shows them, e.g. \"2:30 PM\".
If the text names no time zone, use {timezone}. Time zones must be IANA names such as \"America/New_York\".
Keep the description to at most three short lines.
Use null for anything the text does not say. Do not invent details.
Set confidence to High, Medium or Low depending on how clearly the text describes a single event.

Respond with exactly one JSON object that matches this JSON schema, and nothing else:
{schema}

A rule-based parser produced this draft. It may be wrong or incomplete:
{draft}

Text:
{text}";

/// Build the prompt sent to the model
pub fn build_prompt(
    raw_text: &str,
    draft: &EventRecord,
    options: &RefineOptions,
) -> PicSyncResult<String> {
    let schema = serde_json::to_string_pretty(&schema_for!(AiReply))?;
    let draft = serde_json::to_string_pretty(draft)?;

    Ok(PROMPT_TEMPLATE
        .replace("{today}", &options.today.format("%A, %B %-d, %Y").to_string())
        .replace("{timezone}", &options.default_timezone)
        .replace("{schema}", &schema)
        .replace("{draft}", &draft)
        .replace("{text}", raw_text))
}

/// Refine the draft with the model, falling back to the draft on any failure
pub async fn refine(
    generator: Option<&dyn Generator>,
    raw_text: &str,
    draft: &EventRecord,
    options: &RefineOptions,
) -> EventRecord {
    let Some(generator) = generator else {
        debug!("No AI refiner configured, keeping the draft");
        return draft.clone();
    };

    match try_refine(generator, raw_text, draft, options).await {
        Ok(refined) => {
            info!("Draft refined with {}", generator.name());
            refined
        }
        Err(e) => {
            warn!("AI refinement with {} failed, keeping the draft: {}", generator.name(), e);
            draft.clone()
        }
    }
}

async fn try_refine(
    generator: &dyn Generator,
    raw_text: &str,
    draft: &EventRecord,
    options: &RefineOptions,
) -> PicSyncResult<EventRecord> {
    let prompt = build_prompt(raw_text, draft, options)?;

    let response = tokio::time::timeout(options.timeout, generator.generate(&prompt))
        .await
        .map_err(|_| {
            upstream_error(&format!("Model call timed out after {:?}", options.timeout))
        })??;
    debug!("Model reply: {}", response);

    let suggestion = parse_reply(&response)?.into_record();
    if suggestion.is_empty() && suggestion.duration.is_none() && suggestion.confidence.is_none() {
        return Err(upstream_error("Model reply has none of the expected fields"));
    }

    Ok(draft.merge(&suggestion))
}
