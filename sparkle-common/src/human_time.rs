//! Clock-style time parsing and formatting
//!
//! Lyrics files and the player UI both express positions as `MM:SS` clocks.
//! Internally every position is an `i64` count of milliseconds.

use crate::{Error, Result};

/// Parse a clock string into milliseconds.
///
/// Accepted shapes:
/// - `M:SS` / `MM:SS`
/// - `MM:SS.f`, `MM:SS.ff`, `MM:SS.fff` (fraction of a second, scaled by digit count)
/// - `MM:SS:ff` (colon used as fraction separator, as some karaoke files do)
/// - a bare integer, taken as milliseconds
///
/// # Examples
///
/// ```
/// use sparkle_common::human_time::parse_clock_millis;
///
/// assert_eq!(parse_clock_millis("01:02").unwrap(), 62_000);
/// assert_eq!(parse_clock_millis("00:28.85").unwrap(), 28_850);
/// assert_eq!(parse_clock_millis("00:28.850").unwrap(), 28_850);
/// assert_eq!(parse_clock_millis("1500").unwrap(), 1_500);
/// ```
pub fn parse_clock_millis(text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput("empty time string".to_string()));
    }

    let parts: Vec<&str> = text.split([':', '.']).collect();
    match parts.as_slice() {
        [millis] => parse_number(millis, text),
        [minutes, seconds] => {
            let m = parse_number(minutes, text)?;
            let s = parse_number(seconds, text)?;
            Ok((m * 60 + s) * 1000)
        }
        [minutes, seconds, fraction] => {
            let m = parse_number(minutes, text)?;
            let s = parse_number(seconds, text)?;
            let f = parse_fraction(fraction, text)?;
            Ok((m * 60 + s) * 1000 + f)
        }
        _ => Err(Error::InvalidInput(format!("unrecognised time: {}", text))),
    }
}

/// Scale a 1-3 digit fraction of a second to milliseconds
pub fn parse_fraction(digits: &str, context: &str) -> Result<i64> {
    let value = parse_number(digits, context)?;
    match digits.len() {
        1 => Ok(value * 100),
        2 => Ok(value * 10),
        3 => Ok(value),
        _ => Err(Error::InvalidInput(format!(
            "fraction must have 1-3 digits: {}",
            context
        ))),
    }
}

fn parse_number(digits: &str, context: &str) -> Result<i64> {
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInput(format!("invalid time: {}", context)));
    }
    digits
        .parse::<i64>()
        .map_err(|e| Error::InvalidInput(format!("invalid time {}: {}", context, e)))
}

/// Format milliseconds as `MM:SS`.
///
/// Minutes wrap at one hour, negative input renders as `00:00`.
///
/// ```
/// use sparkle_common::human_time::format_clock;
///
/// assert_eq!(format_clock(62_000), "01:02");
/// assert_eq!(format_clock(-5), "00:00");
/// ```
pub fn format_clock(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format milliseconds as `MM:SS.mmm` without wrapping the minutes
pub fn format_clock_millis(millis: i64) -> String {
    let millis = millis.max(0);
    let total_seconds = millis / 1000;
    format!(
        "{:02}:{:02}.{:03}",
        total_seconds / 60,
        total_seconds % 60,
        millis % 1000
    )
}
