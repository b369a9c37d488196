use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Duration used when nothing better is known
pub const DEFAULT_DURATION: &str = "1 hour";

/// How sure the generative model is about its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            other => Err(format!("Unknown confidence level: {}", other)),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A calendar event inferred from OCR text.
///
/// Every field is optional. Later stages only ever replace a field with a
/// non-empty value, see [`EventRecord::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Human-readable event name
    pub title: Option<String>,
    /// Calendar date as found in the text (e.g. "10/03/2025" or "Oct 3, 2025")
    pub date: Option<String>,
    /// Start time in whatever format the source used
    pub start_time: Option<String>,
    /// End time in whatever format the source used
    pub end_time: Option<String>,
    /// IANA zone name, only ever set by the refiner
    pub timezone: Option<String>,
    /// Line carrying a venue, room or address
    pub location: Option<String>,
    /// Up to three leftover lines
    pub description: Option<String>,
    /// Human-readable duration
    pub duration: Option<String>,
    /// Only ever set by the refiner
    pub confidence: Option<Confidence>,
}

impl EventRecord {
    /// True when no text field carries a value
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.timezone.is_none()
            && self.location.is_none()
            && self.description.is_none()
    }

    /// Duration, falling back to one hour
    pub fn duration_or_default(&self) -> &str {
        self.duration.as_deref().unwrap_or(DEFAULT_DURATION)
    }

    /// Overlay `later` on top of `self`.
    ///
    /// A field from `later` wins only if it holds a non-blank value; absent or
    /// blank values never erase what `self` already had.
    pub fn merge(&self, later: &EventRecord) -> EventRecord {
        EventRecord {
            title: coalesce(&later.title, &self.title),
            date: coalesce(&later.date, &self.date),
            start_time: coalesce(&later.start_time, &self.start_time),
            end_time: coalesce(&later.end_time, &self.end_time),
            timezone: coalesce(&later.timezone, &self.timezone),
            location: coalesce(&later.location, &self.location),
            description: coalesce(&later.description, &self.description),
            duration: coalesce(&later.duration, &self.duration),
            confidence: later.confidence.or(self.confidence),
        }
    }
}

/// Trim a value and drop it if nothing is left
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn coalesce(later: &Option<String>, earlier: &Option<String>) -> Option<String> {
    non_blank(later.clone()).or_else(|| earlier.clone())
}
