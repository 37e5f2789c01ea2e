//! # Date patterns
//!
//! A pattern is plain text with five recognised markers:
//!
//! | marker | field | rendered as | parsed from |
//! |---|---|---|---|
//! | `yyyy` | year | 4 digits | exactly 4 digits |
//! | `MM` | month, 1-based | 2 digits | 1 or 2 digits |
//! | `dd` | day of month | 2 digits | 1 or 2 digits |
//! | `HH` | hour, 24h | 2 digits | 1 or 2 digits |
//! | `mm` | minute | 2 digits | 1 or 2 digits |
//!
//! Markers are found by a left-to-right scan trying them in the order above;
//! everything else is literal text. Seconds are never rendered, so a round
//! trip keeps minute precision:
//!
//! ```rust
//! use chrono::Utc;
//! use timewarp_core::format::{format_in, parse_in};
//!
//! let t = 1_704_164_640_000; // 2024-01-02 03:04 UTC
//! let s = format_in(&Utc, t, "yyyy/MM/dd HH:mm");
//! assert_eq!(s, "2024/01/02 03:04");
//! assert_eq!(parse_in(&Utc, &s, "yyyy/MM/dd HH:mm"), Some(t));
//! ```
//!
//! Parsing never fails loudly: a mismatch yields `None`. Fields outside their
//! calendar range roll over into the next unit (`2024-13-40` is 2025-02-09).

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeDelta, TimeZone, Timelike};
use smallvec::SmallVec;

pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatToken {
    Year = 0,
    Month = 1,
    Day = 2,
    Hour = 3,
    Minute = 4,
}

impl FormatToken {
    /// Scan priority.
    pub const ALL: [FormatToken; 5] = [
        FormatToken::Year,
        FormatToken::Month,
        FormatToken::Day,
        FormatToken::Hour,
        FormatToken::Minute,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            FormatToken::Year => "yyyy",
            FormatToken::Month => "MM",
            FormatToken::Day => "dd",
            FormatToken::Hour => "HH",
            FormatToken::Minute => "mm",
        }
    }

    /// Accepted digit counts when parsing.
    fn digits(self) -> (usize, usize) {
        match self {
            FormatToken::Year => (4, 4),
            _ => (1, 2),
        }
    }

    fn render(self, f: &Fields) -> String {
        match self {
            FormatToken::Year => format!("{:04}", f.year),
            FormatToken::Month => format!("{:02}", f.month),
            FormatToken::Day => format!("{:02}", f.day),
            FormatToken::Hour => format!("{:02}", f.hour),
            FormatToken::Minute => format!("{:02}", f.minute),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Token(FormatToken),
}

pub fn tokenize(pattern: &str) -> SmallVec<[Segment<'_>; 8]> {
    let mut out = SmallVec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < pattern.len() {
        let rest = &pattern[i..];
        match FormatToken::ALL
            .into_iter()
            .find(|t| rest.starts_with(t.marker()))
        {
            Some(token) => {
                if literal_start < i {
                    out.push(Segment::Literal(&pattern[literal_start..i]));
                }
                out.push(Segment::Token(token));
                i += token.marker().len();
                literal_start = i;
            }
            None => i += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if literal_start < pattern.len() {
        out.push(Segment::Literal(&pattern[literal_start..]));
    }
    out
}

struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl Fields {
    fn of<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Fields {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

/// Formats `timestamp` (ms since the epoch) in the local time zone.
pub fn format(timestamp: i64, pattern: &str) -> String {
    format_in(&Local, timestamp, pattern)
}

/// Formats `timestamp` in `tz`. Out-of-range timestamps render each marker as `NaN`.
pub fn format_in<Tz: TimeZone>(tz: &Tz, timestamp: i64, pattern: &str) -> String {
    let fields = tz
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| Fields::of(&dt));
    let mut out = String::with_capacity(pattern.len() + 4);
    for segment in tokenize(pattern) {
        match (segment, &fields) {
            (Segment::Literal(s), _) => out.push_str(s),
            (Segment::Token(t), Some(f)) => out.push_str(&t.render(f)),
            (Segment::Token(_), None) => out.push_str("NaN"),
        }
    }
    out
}

/// Parses `value` against `pattern` in the local time zone.
pub fn parse(value: &str, pattern: &str) -> Option<i64> {
    parse_in(&Local, value, pattern)
}

/// Parses `value` against `pattern` in `tz`, returning ms since the epoch.
///
/// `None` when the trimmed input does not match the pattern structurally or
/// when the pattern lacks a year, month or day marker. Missing hour and
/// minute default to 0.
pub fn parse_in<Tz: TimeZone>(tz: &Tz, value: &str, pattern: &str) -> Option<i64> {
    let segments = tokenize(pattern);
    let Some(captures) = match_segments(&segments, value.trim(), [None; 5]) else {
        log::debug!("parse: {value:?} does not match {pattern:?}");
        return None;
    };
    let [year, month, day, hour, minute] = captures;
    local_timestamp(
        tz,
        year?,
        month?,
        day?,
        hour.unwrap_or(0),
        minute.unwrap_or(0),
    )
}

type Captures = [Option<i64>; 5];

// Backtracking over variable-width fields: longest digit run first.
fn match_segments(segments: &[Segment<'_>], input: &str, captures: Captures) -> Option<Captures> {
    let Some((first, rest)) = segments.split_first() else {
        return input.is_empty().then_some(captures);
    };
    match *first {
        Segment::Literal(lit) => input
            .strip_prefix(lit)
            .and_then(|tail| match_segments(rest, tail, captures)),
        Segment::Token(token) => {
            let available = input.bytes().take_while(|b| b.is_ascii_digit()).count();
            let (min, max) = token.digits();
            (min..=max.min(available)).rev().find_map(|len| {
                let value: i64 = input[..len].parse().ok()?;
                let mut captures = captures;
                let slot = &mut captures[token as usize];
                // A repeated marker must agree with its first capture.
                if slot.is_some_and(|prev| prev != value) {
                    return None;
                }
                *slot = Some(value);
                match_segments(rest, &input[len..], captures)
            })
        }
    }
}

/// Builds a local wall-clock time, rolling overflowing fields into the next
/// unit. Wall times skipped by a DST jump resolve one hour later.
fn local_timestamp<Tz: TimeZone>(
    tz: &Tz,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
) -> Option<i64> {
    let months = year * 12 + (month - 1);
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let offset = TimeDelta::try_minutes((day - 1) * 24 * 60 + hour * 60 + minute)?;
    let naive = NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(offset)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            let shifted = naive.checked_add_signed(TimeDelta::try_hours(1)?)?;
            tz.from_local_datetime(&shifted).earliest()
        })
        .map(|dt| dt.timestamp_millis())
}
