//! Wall-clock time-of-day and weekday helpers.
//!
//! Times are `HH:MM` strings in local wall-clock time. Nothing here wraps around midnight and
//! nothing panics: malformed input degrades to `None` or `false`.

use chrono::Weekday;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

pub fn normalize_weekday(day: &str) -> String {
    day.trim().to_lowercase()
}

/// Resolves a free-text weekday name (case and surrounding whitespace ignored).
pub fn parse_weekday(day: &str) -> Option<Weekday> {
    match normalize_weekday(day).as_str() {
        "sunday" => Some(Weekday::Sun),
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Maps `sunday..saturday` to `0..6`.
pub fn weekday_to_index(day: &str) -> Option<u32> {
    parse_weekday(day).map(|weekday| weekday.num_days_from_sunday())
}

pub fn index_to_weekday(index: i64) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|index| WEEKDAYS.get(index).copied())
}

pub fn is_weekday(day: &str) -> bool {
    weekday_to_index(day).is_some()
}

/// Parses `HH:MM` into minutes after midnight.
///
/// The hour may be one or two digits, the minute must be two digits, and the value must fall
/// within `00:00..=23:59`.
pub fn parse_time_to_minutes(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

/// Formats minutes after midnight as zero-padded `HH:MM`.
///
/// Values outside a single day are not rejected; they format through Euclidean division, so
/// `1440` renders as `24:00` and `-5` as `-1:55`.
pub fn format_minutes_to_time(value: i64) -> String {
    let hours = value.div_euclid(60);
    let minutes = value.rem_euclid(60);
    format!("{hours:02}:{minutes:02}")
}

/// Shifts a time by `delta_minutes`, returning `None` when the input is malformed or the result
/// leaves `[00:00, 24:00]`.
pub fn add_minutes_to_time(time: &str, delta_minutes: i64) -> Option<String> {
    let current = i64::from(parse_time_to_minutes(time)?);
    let total = current.checked_add(delta_minutes)?;
    if !(0..=MINUTES_PER_DAY).contains(&total) {
        return None;
    }

    Some(format_minutes_to_time(total))
}

/// Half-open `[start, end)` membership test. Inverted or empty ranges never match.
pub fn is_time_in_range(target: &str, start: &str, end: &str) -> bool {
    let (Some(target), Some(start), Some(end)) = (
        parse_time_to_minutes(target),
        parse_time_to_minutes(start),
        parse_time_to_minutes(end),
    ) else {
        return false;
    };

    end > start && target >= start && target < end
}

/// Parses a `start..end` pair into minutes, rejecting malformed and inverted ranges.
pub fn parse_time_range(start: &str, end: &str) -> Option<(u32, u32)> {
    let start = parse_time_to_minutes(start)?;
    let end = parse_time_to_minutes(end)?;
    (end > start).then_some((start, end))
}
