use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::table::CellValue;

/// Layouts that carry an explicit UTC offset.
const ZONED_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Layouts without offset information; read as UTC.
const NAIVE_LAYOUTS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
];

const DATE_LAYOUTS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// Compact layout whose fields are not separated.
const COMPACT_DATE_LAYOUT: &str = "%Y%m%d";

/// Years a parsed value must fall in. Spreadsheet serial dates start at 1900.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Parse a textual timestamp into UTC.
///
/// Accepts RFC 3339, RFC 2822, ISO-like date-times with or without an offset,
/// a handful of common slash and dot layouts, and bare dates (midnight).
/// Values without an offset are taken to be UTC. Layout matches need a
/// four-digit year, and results outside 1900..=9999 are rejected, so version
/// strings such as `1.2.3` stay text.
pub fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_any(text).filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn parse_any(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ZONED_LAYOUTS {
        if !has_full_year(text, layout) {
            continue;
        }
        if let Ok(dt) = DateTime::parse_from_str(text, layout) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for layout in NAIVE_LAYOUTS {
        if !has_full_year(text, layout) {
            continue;
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    for layout in DATE_LAYOUTS {
        if !has_full_year(text, layout) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Some(Utc.from_utc_datetime(&dt));
            }
        }
    }
    None
}

/// Whether the digit run `layout` reads as `%Y` has exactly four digits.
///
/// chrono's `%Y` takes one to four digits, which would read `1.2.3` as year 3.
fn has_full_year(text: &str, layout: &str) -> bool {
    if layout == COMPACT_DATE_LAYOUT {
        return text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit());
    }
    let year_run = if layout.starts_with("%Y") { 0 } else { 2 };
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .nth(year_run)
        .is_some_and(|run| run.len() == 4)
}

/// Parse a cell as a UTC timestamp.
///
/// Only text and already-zoned timestamps are accepted. Numbers, booleans and
/// missing values never parse, so counters and flags that happen to carry a
/// temporal-looking name stay as they are.
pub fn parse_timestamp(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Text(text) => parse_timestamp_text(text),
        CellValue::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
        CellValue::Null | CellValue::Bool(_) | CellValue::Integer(_) | CellValue::Float(_) => {
            None
        }
    }
}
