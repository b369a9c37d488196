//! Deterministic event extraction from OCR text.
//!
//! Each field is found by an independent pass over the normalized lines or the
//! whole text. Date and time rules are ordered lists where the first match wins.

mod patterns;
mod title;

pub use patterns::matches_date_or_time;
pub use title::is_metadata;

use crate::model::{non_blank, EventRecord, DEFAULT_DURATION};
use patterns::{first_capture, DATE_RULES, LOCATION_MARKER, MERIDIEM, RANGE_TAIL, TIME_RULES};
use tracing::debug;

/// Maximum number of leftover lines kept as description
pub const MAX_DESCRIPTION_LINES: usize = 3;

/// Build a best-effort draft record from raw OCR text
pub fn extract(raw_text: &str) -> EventRecord {
    let text = raw_text.trim();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let title = title::select_title(&lines);
    let date = find_date(text);
    let (start_time, end_time) = find_times(text);
    let location = find_location(&lines);

    let description_lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| Some(*l) != title && Some(*l) != location && !matches_date_or_time(l))
        .take(MAX_DESCRIPTION_LINES)
        .collect();

    debug!(
        "Extracted draft: title={:?} date={:?} start={:?} end={:?} location={:?}",
        title, date, start_time, end_time, location
    );

    EventRecord {
        title: non_blank(title.map(str::to_string)),
        date,
        start_time,
        end_time,
        timezone: None,
        location: non_blank(location.map(str::to_string)),
        description: non_blank(Some(description_lines.join("\n"))),
        duration: Some(DEFAULT_DURATION.to_string()),
        confidence: None,
    }
}

fn find_date(text: &str) -> Option<String> {
    first_capture(&DATE_RULES, text).map(|(rule, m)| {
        debug!("Date matched rule {}: {}", rule, m.as_str());
        m.as_str().to_string()
    })
}

/// Start time from the first matching rule, plus an end time when the start is
/// directly followed by a range such as "to 4:00 PM"
fn find_times(text: &str) -> (Option<String>, Option<String>) {
    let Some((rule, start)) = first_capture(&TIME_RULES, text) else {
        return (None, None);
    };
    debug!("Time matched rule {}: {}", rule, start.as_str());

    let end = RANGE_TAIL
        .captures(&text[start.end()..])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        // "2 PM - 4" is ambiguous, only accept an end with the same clock style
        .filter(|end| MERIDIEM.is_match(start.as_str()) == MERIDIEM.is_match(end))
        .map(str::to_string);

    (Some(start.as_str().to_string()), end)
}

fn find_location<'a>(lines: &[&'a str]) -> Option<&'a str> {
    lines.iter().copied().find(|l| LOCATION_MARKER.is_match(l))
}
