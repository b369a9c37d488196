//! Google Calendar "render" URL construction.

pub mod time;

use crate::error::{date_time_error, PicSyncResult};
use crate::model::EventRecord;
use chrono::NaiveDate;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use urlencoding::encode;

pub use time::convert_to_24h;
use time::{add_hour, parse_clock};

/// Template URL every invite link starts from
pub const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";

/// Textual date layouts tried after the MM/DD/YYYY and dashed forms.
/// `%B` accepts both full and abbreviated month names when parsing.
const TEXT_DATE_FORMATS: [&str; 4] = ["%B %d, %Y", "%B %d %Y", "%d %B %Y", "%d %B, %Y"];

lazy_static! {
    static ref ORDINAL: Regex = Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("ordinal regex");
    static ref SEPT: Regex = Regex::new(r"(?i)\bsept\b").expect("sept regex");
}

/// Build a pre-filled Google Calendar link for the record.
///
/// Never fails: a date or time that cannot be understood degrades to a
/// noon-to-one window built from the raw date text.
pub fn build_url(record: &EventRecord) -> String {
    let mut params = Vec::new();

    if let Some(title) = present(&record.title) {
        params.push(format!("text={}", encode(title)));
    }

    if let Some(date) = present(&record.date) {
        let window = event_window(date, record.start_time.as_deref(), record.end_time.as_deref())
            .unwrap_or_else(|e| {
                debug!("Using fallback calendar window: {}", e);
                fallback_window(date)
            });
        params.push(format!("dates={}", window));
    }

    if let Some(zone) = present(&record.timezone).filter(|z| z.parse::<Tz>().is_ok()) {
        params.push(format!("ctz={}", encode(zone)));
    }

    if let Some(location) = present(&record.location) {
        params.push(format!("location={}", encode(location)));
    }

    if let Some(description) = present(&record.description) {
        params.push(format!("details={}", encode(description)));
    }

    if params.is_empty() {
        CALENDAR_BASE_URL.to_string()
    } else {
        format!("{}&{}", CALENDAR_BASE_URL, params.join("&"))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `YYYYMMDDTHHMMSS/YYYYMMDDTHHMMSS` on the event's date
fn event_window(date: &str, start: Option<&str>, end: Option<&str>) -> PicSyncResult<String> {
    let day = parse_event_date(date)?.format("%Y%m%d").to_string();

    let (start_hour, start_minute) = parse_clock(&convert_to_24h(start)?)?;
    let start_clock = (start_hour, start_minute);
    let (end_hour, end_minute) = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => end_after_start(start_clock, parse_clock(&convert_to_24h(Some(end))?)?),
        None => add_hour(start_clock),
    };

    Ok(format!(
        "{day}T{:02}{:02}00/{day}T{:02}{:02}00",
        start_hour, start_minute, end_hour, end_minute
    ))
}

/// An end before the start crossed midnight and is clamped to the end of the
/// day, an end equal to the start gets the default hour
fn end_after_start(start: (u32, u32), end: (u32, u32)) -> (u32, u32) {
    if end > start {
        end
    } else if end < start {
        debug!("End {:?} is before start {:?}, clamping to 23:59", end, start);
        (23, 59)
    } else {
        add_hour(start)
    }
}

fn fallback_window(date: &str) -> String {
    let compact = encode(&date.replace('/', "")).into_owned();
    format!("{compact}T120000/{compact}T130000")
}

/// Parse the loosely formatted dates the extractor and refiner produce.
///
/// Slashed dates are always month/day/year. Two-digit years land in 20xx.
pub fn parse_event_date(date: &str) -> PicSyncResult<NaiveDate> {
    let date = date.trim();

    if date.contains('/') {
        let parts: Vec<&str> = date.split('/').collect();
        if parts.len() != 3 {
            return Err(date_time_error(&format!("Expected MM/DD/YYYY, got '{}'", date)));
        }
        return numeric_date(parts[2], parts[0], parts[1], date);
    }

    let dashed: Vec<&str> = date.split('-').collect();
    if dashed.len() == 3 && dashed.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return if dashed[0].len() == 4 {
            numeric_date(dashed[0], dashed[1], dashed[2], date)
        } else {
            numeric_date(dashed[2], dashed[0], dashed[1], date)
        };
    }

    let cleaned = ORDINAL.replace_all(date, "$1").replace('.', "");
    let cleaned = SEPT.replace_all(&cleaned, "Sep");
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .ok_or_else(|| date_time_error(&format!("Unrecognised date '{}'", date)))
}

fn numeric_date(year: &str, month: &str, day: &str, original: &str) -> PicSyncResult<NaiveDate> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| date_time_error(&format!("Non-numeric date part in '{}'", original)))
    };
    let mut year = parse(year)? as i32;
    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, parse(month)?, parse(day)?)
        .ok_or_else(|| date_time_error(&format!("No such date '{}'", original)))
}
