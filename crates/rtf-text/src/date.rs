//! Date and time parsing and locale-aware formatting

use crate::locale::Locale;
use crate::options::FormatOptions;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike};
use std::fmt::Write;

/// Parse an ISO 8601 date-time such as `2024-03-01T09:30:00Z`
///
/// The whole string must be a date-time (`YYYY-MM-DDTHH:MM:SS`, optional
/// fraction, optional `Z` or numeric offset). Values without an offset are
/// read as wall-clock time in `offset`.
///
/// # Examples
/// ```
/// use chrono::FixedOffset;
/// use rtf_text::parse_iso_datetime;
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// assert!(parse_iso_datetime("2024-03-01T09:30:00.000+01:00", utc).is_some());
/// assert!(parse_iso_datetime("2024-03-01", utc).is_none());
/// assert!(parse_iso_datetime("due 2024-03-01T09:30:00", utc).is_none());
/// ```
pub fn parse_iso_datetime(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let bytes = text.as_bytes();
    if bytes.len() < 19 || bytes[10] != b'T' {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Format a wall-clock date-time for a locale
///
/// With neither `dateStyle` nor `timeStyle` set, the locale's default date
/// and time are joined. Number options are ignored.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use rtf_text::{format_datetime, FormatOptions, Locale};
///
/// let dt = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 5, 0).unwrap();
/// let de = Locale::from_tag("de-DE").unwrap();
/// assert_eq!(format_datetime(&dt, &de, &FormatOptions::default()), "1.3.2024, 09:05:00");
/// ```
pub fn format_datetime(dt: &NaiveDateTime, locale: &Locale, options: &FormatOptions) -> String {
    let date = options.date_style.map(|s| locale.date_pattern(s));
    let time = options.time_style.map(|s| locale.time_pattern(s));

    let (date, time) = match (date, time) {
        (None, None) => (
            Some(locale.default_date_pattern()),
            Some(locale.default_time_pattern()),
        ),
        other => other,
    };

    match (date, time) {
        (Some(d), Some(t)) => format!(
            "{}{}{}",
            render_pattern(d, dt, locale),
            locale.date_time_joiner(),
            render_pattern(t, dt, locale)
        ),
        (Some(d), None) => render_pattern(d, dt, locale),
        (None, Some(t)) => render_pattern(t, dt, locale),
        (None, None) => String::new(),
    }
}

/// Render a CLDR-style pattern
///
/// Runs of the same letter form one field; text in single quotes is copied
/// verbatim.
fn render_pattern(pattern: &str, dt: &NaiveDateTime, locale: &Locale) -> String {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            for quoted in chars.by_ref() {
                if quoted == '\'' {
                    break;
                }
                out.push(quoted);
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            continue;
        }

        let mut width = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            width += 1;
        }
        render_field(&mut out, c, width, dt, locale);
    }

    out
}

fn render_field(out: &mut String, symbol: char, width: usize, dt: &NaiveDateTime, locale: &Locale) {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };

    // writing to a String cannot fail
    let _ = match (symbol, width) {
        ('y', 2) => write!(out, "{:02}", dt.year().rem_euclid(100)),
        ('y', _) => write!(out, "{}", dt.year()),
        ('M', 1) => write!(out, "{}", dt.month()),
        ('M', 2) => write!(out, "{:02}", dt.month()),
        ('M', 3) => write!(out, "{}", locale.month_name(dt.month(), true)),
        ('M', _) => write!(out, "{}", locale.month_name(dt.month(), false)),
        ('d', 1) => write!(out, "{}", dt.day()),
        ('d', _) => write!(out, "{:02}", dt.day()),
        ('E', _) => write!(
            out,
            "{}",
            locale.weekday_name(dt.weekday().num_days_from_monday())
        ),
        ('H', 1) => write!(out, "{}", dt.hour()),
        ('H', _) => write!(out, "{:02}", dt.hour()),
        ('h', 1) => write!(out, "{hour12}"),
        ('h', _) => write!(out, "{hour12:02}"),
        ('m', _) => write!(out, "{:02}", dt.minute()),
        ('s', _) => write!(out, "{:02}", dt.second()),
        ('a', _) => write!(out, "{}", if dt.hour() < 12 { "AM" } else { "PM" }),
        _ => {
            for _ in 0..width {
                out.push(symbol);
            }
            Ok(())
        }
    };
}
