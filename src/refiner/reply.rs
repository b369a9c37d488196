use crate::error::{upstream_error, PicSyncResult};
use crate::model::{non_blank, Confidence, EventRecord};
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{from_str, Value};
use tracing::{debug, error};

/// The JSON object the model is asked to return
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct AiReply {
    /// Short event name
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Event date as MM/DD/YYYY
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    /// Start time, e.g. "2:30 PM"
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    /// End time, e.g. "4:00 PM"
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
    /// IANA time zone name, e.g. "America/New_York"
    #[serde(default, deserialize_with = "lenient_string")]
    pub timezone: Option<String>,
    /// Venue, room or address
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    /// At most three short lines of extra detail
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Human-readable duration, e.g. "90 minutes"
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    /// One of High, Medium or Low
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "Option<Confidence>")]
    pub confidence: Option<String>,
    /// Some replies name the start time `time`
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(skip)]
    pub time: Option<String>,
}

impl AiReply {
    /// Convert into a record, dropping blank values, unknown zones and
    /// unknown confidence levels. `start_time` wins over `time`.
    pub fn into_record(self) -> EventRecord {
        EventRecord {
            title: non_blank(self.title),
            date: non_blank(self.date),
            start_time: non_blank(self.start_time).or_else(|| non_blank(self.time)),
            end_time: non_blank(self.end_time),
            timezone: non_blank(self.timezone).filter(|tz| tz.parse::<Tz>().is_ok()),
            location: non_blank(self.location),
            description: non_blank(self.description),
            duration: non_blank(self.duration),
            confidence: self.confidence.and_then(|c| c.parse().ok()),
        }
    }
}

/// Accept strings, numbers and booleans; treat anything else as missing
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Remove a surrounding Markdown code fence such as ```json ... ```
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip an info string like "json" on the opening fence line
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };

    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse text that must hold a single JSON object
fn parse_object(json: &str) -> Result<AiReply, String> {
    match from_str::<Value>(json) {
        Ok(value @ Value::Object(_)) => AiReply::deserialize(value).map_err(|e| e.to_string()),
        Ok(_) => Err("reply is not a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Attempt to parse the reply object from the model response
pub fn parse_reply(response: &str) -> PicSyncResult<AiReply> {
    let body = strip_code_fence(response);

    match parse_object(body) {
        Ok(reply) => return Ok(reply),
        Err(e) => debug!("Reply is not a bare JSON object: {}", e),
    }

    // Try to extract a JSON object from surrounding prose
    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            let json_str = &body[start..=end];
            match parse_object(json_str) {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    error!("Failed to parse JSON from response: {}", e);
                    error!("JSON string: {}", json_str);
                }
            }
        }
    }

    Err(upstream_error("Could not extract valid JSON from the model response"))
}
