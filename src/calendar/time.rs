use crate::error::{date_time_error, PicSyncResult};

/// Time used when the record has none
pub const DEFAULT_START: &str = "12:00";

/// Parse time string in H:MM or bare H format
pub fn parse_clock(time_str: &str) -> PicSyncResult<(u32, u32)> {
    let time_str = time_str.trim();
    let (hour, minute) = match time_str.split_once(':') {
        Some((h, m)) => (h.trim(), m.trim()),
        None => (time_str, "0"),
    };

    let hour = hour
        .parse::<u32>()
        .map_err(|_| date_time_error(&format!("Invalid hour in '{}'", time_str)))?;
    let minute = minute
        .parse::<u32>()
        .map_err(|_| date_time_error(&format!("Invalid minute in '{}'", time_str)))?;

    if hour > 23 || minute > 59 {
        return Err(date_time_error(&format!("Time out of range: '{}'", time_str)));
    }
    Ok((hour, minute))
}

/// Normalize a time string to 24-hour "HH:MM".
///
/// No time means noon. Text with PM or AM is converted from 12-hour clock,
/// anything else is taken to already be 24-hour: it passes through if it has
/// a colon and gets ":00" appended otherwise.
pub fn convert_to_24h(time: Option<&str>) -> PicSyncResult<String> {
    let Some(raw) = time.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(DEFAULT_START.to_string());
    };

    let lower = raw
        .to_ascii_lowercase()
        .replace("p.m.", "pm")
        .replace("a.m.", "am");

    if let Some(idx) = lower.find("pm") {
        let (hour, minute) = parse_meridiem_clock(&lower[..idx])?;
        let hour = if hour == 12 { 12 } else { hour + 12 };
        return Ok(format!("{:02}:{:02}", hour, minute));
    }

    if let Some(idx) = lower.find("am") {
        let (hour, minute) = parse_meridiem_clock(&lower[..idx])?;
        let hour = if hour == 12 { 0 } else { hour };
        return Ok(format!("{:02}:{:02}", hour, minute));
    }

    if raw.contains(':') {
        Ok(raw.to_string())
    } else {
        Ok(format!("{}:00", raw))
    }
}

fn parse_meridiem_clock(clock: &str) -> PicSyncResult<(u32, u32)> {
    let (hour, minute) = parse_clock(clock)?;
    if !(1..=12).contains(&hour) {
        return Err(date_time_error(&format!("Hour {} is not on a 12-hour clock", hour)));
    }
    Ok((hour, minute))
}

/// One hour after `start`, clamped to 23:59 so the end stays on the same day
pub fn add_hour((hour, minute): (u32, u32)) -> (u32, u32) {
    if hour >= 23 {
        (23, 59)
    } else {
        (hour + 1, minute)
    }
}
