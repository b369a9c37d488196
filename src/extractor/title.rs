use super::patterns::{matches_date_or_time, TIME_LIKE};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// Lines that look like mail/chat headers or bare timestamps
    static ref METADATA: Vec<Regex> = [
        r"(?i)^(?:from|to|cc|bcc|sent|reply-to)\s*:",
        r"(?i)^(?:re|fw|fwd)\s*:",
        r"^[^<>@]{1,60}<[^<>\s]+@[^<>\s]+>$",
        r"^[\w.+-]+@[\w-]+(?:\.[\w-]+)+$",
        r"(?i)^\(?(?:today|yesterday)?\s*(?:at\s+)?\d{1,2}:\d{2}(?::\d{2})?\s*(?:[ap]m)?\)?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("metadata regex"))
    .collect();

    static ref EVENT_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:interview|meeting|session|conference|workshop|webinar|seminar|lecture|orientation|appointment|meetup|hackathon)s?\b"
    )
    .expect("event keyword regex");

    static ref INFO_SESSION: Regex =
        Regex::new(r"(?i)\binfo(?:rmation)?\s+session\b").expect("info session regex");

    static ref INSTITUTION: Regex =
        Regex::new(r"(?i)\b(?:university|college|school)\b").expect("institution regex");
}

/// Header-ish lines that never make a good title
pub fn is_metadata(line: &str) -> bool {
    METADATA.iter().any(|re| re.is_match(line))
}

fn is_candidate(line: &str) -> bool {
    !is_metadata(line)
        && line.chars().count() > 5
        && !TIME_LIKE.is_match(line)
        && !matches_date_or_time(line)
}

fn is_institution_handle(line: &str) -> bool {
    line.contains('@') && INSTITUTION.is_match(line)
}

/// Pick the title line.
///
/// Candidates are checked for an event keyword first, then for info-session or
/// "@ University" style lines, then the first candidate wins. With no
/// candidates at all the first line is used.
pub fn select_title<'a>(lines: &[&'a str]) -> Option<&'a str> {
    let candidates: Vec<&'a str> = lines.iter().copied().filter(|l| is_candidate(l)).collect();

    if let Some(line) = candidates.iter().find(|l| EVENT_KEYWORD.is_match(l)) {
        debug!("Title chosen by event keyword: {}", line);
        return Some(*line);
    }

    if let Some(line) = candidates
        .iter()
        .find(|l| INFO_SESSION.is_match(l) || is_institution_handle(l))
    {
        debug!("Title chosen by session/institution cue: {}", line);
        return Some(*line);
    }

    candidates.first().or_else(|| lines.first()).copied()
}
