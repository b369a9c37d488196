use lazy_static::lazy_static;
use regex::{Match, Regex};

/// Month name prefix shared by the textual date rules
const MONTH: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?";
/// Weekday names for the "Weekday, DD Month" rule
const WEEKDAY: &str = r"(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";

/// A named pattern whose first capture group is the extracted value
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    regex: Regex,
}

impl Rule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("extraction rule must be a valid regex"),
        }
    }

    /// First capture group of the first match, if any
    pub fn capture<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.regex.captures(text).and_then(|caps| caps.get(1))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

lazy_static! {
    /// Date rules in priority order
    pub static ref DATE_RULES: Vec<Rule> = vec![
        Rule::new(
            "labelled",
            &format!(r"(?i)\bdate[ \t]*:[ \t]*({MONTH}[ \t]+\d{{1,2}}(?:st|nd|rd|th)?,?[ \t]+\d{{4}})"),
        ),
        Rule::new("numeric", r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b"),
        Rule::new(
            "day_month_year",
            &format!(r"(?i)\b(\d{{1,2}}[ \t]+{MONTH}[ \t]+\d{{2,4}})\b"),
        ),
        Rule::new(
            "weekday_day_month",
            &format!(r"(?i)\b({WEEKDAY}[, \t]+\d{{1,2}}[ \t]+{MONTH})"),
        ),
        Rule::new(
            "month_day_year",
            &format!(r"(?i)\b({MONTH}[ \t]+\d{{1,2}}(?:st|nd|rd|th)?,?[ \t]+\d{{4}})\b"),
        ),
    ];

    /// Time rules in priority order
    pub static ref TIME_RULES: Vec<Rule> = vec![
        Rule::new("labelled", r"(?i)\btime[ \t]*:[ \t]*(\d{1,2}:\d{2}[ \t]*[ap]m)\b"),
        Rule::new("clock_meridiem", r"(?i)\b(\d{1,2}:\d{2}[ \t]*[ap]m)\b"),
        Rule::new("hour_meridiem", r"(?i)\b(\d{1,2}[ \t]*[ap]m)\b"),
        Rule::new("clock_24h", r"\b(\d{1,2}:\d{2})\b"),
    ];

    /// Separator plus second time directly after a start time
    pub static ref RANGE_TAIL: Regex = Regex::new(
        r"(?i)^[ \t]*(?:-|–|—|to|until|till|through)[ \t]*(\d{1,2}(?::\d{2})?[ \t]*[ap]m|\d{1,2}:\d{2})\b"
    )
    .expect("range regex");

    /// Anything shaped like "3:30" or "10/03"
    pub static ref TIME_LIKE: Regex = Regex::new(r"\d{1,2}[:/]\d{2}").expect("time-like regex");

    pub static ref MERIDIEM: Regex = Regex::new(r"(?i)[ap]m\b").expect("meridiem regex");

    /// Markers that make a line a location
    pub static ref LOCATION_MARKER: Regex = Regex::new(
        r"(?i)\bat[ \t]|location:|venue:|room[ \t:]|building|address:|place:|where:"
    )
    .expect("location regex");
}

/// Run rules in order and stop at the first one that captures
pub fn first_capture<'t>(rules: &[Rule], text: &'t str) -> Option<(&'static str, Match<'t>)> {
    rules
        .iter()
        .find_map(|rule| rule.capture(text).map(|m| (rule.name, m)))
}

/// True if any date or time rule matches the line
pub fn matches_date_or_time(line: &str) -> bool {
    DATE_RULES
        .iter()
        .chain(TIME_RULES.iter())
        .any(|rule| rule.is_match(line))
}
