//! Script syntax shared by HRCX and HRCS
//!
//! ```text
//! [ti:Title];
//! [ar:Artist];
//! haplayer.tag[al:Album];
//! haplayer.extra.lrc('<base64 json>');
//! haplayer.lrc('1200,56000','[hello] world','<0,300,0><300,500,0>');
//! ```
//!
//! Both formats are stored as a zlib stream of this text.

use super::{
    apply_tag, bracket_value, call_body, parse_word_timing, tag_entries, word_timing_markup,
};
use crate::codec::{compress, decode_text, decompress};
use crate::error::Result;
use crate::extra::{decode_extra, encode_extra, ExtraStyle};
use crate::model::{ExtraLyrics, LyricsFormat, LyricsInfo};
use tracing::warn;

pub const TAG_PREFIX: &str = "haplayer.tag[";
pub const EXTRA_PREFIX: &str = "haplayer.extra.lrc";
pub const LINE_PREFIX: &str = "haplayer.lrc";

const CALL_SEPARATOR: &str = "','";

/// Header tags with a dedicated `[key:value];` line
const HEADER_KEYS: [&str; 5] = ["ti", "ar", "offset", "by", "total"];

/// Raw fields of one `haplayer.lrc(...)` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub starts: Vec<i64>,
    pub text: String,
    pub durations: Vec<i64>,
}

/// Inflate and decode the script text
pub fn inflate(data: &[u8], format: LyricsFormat) -> Result<String> {
    let raw = decompress(data)?;
    Ok(decode_text(&raw, format_name(format)))
}

/// Parse the script. Header and extra lines fill `info`, lyric calls are
/// returned for the format to turn into lines.
pub fn parse_script(text: &str, info: &mut LyricsInfo) -> Vec<ScriptLine> {
    let format = info.format;
    let mut calls = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(EXTRA_PREFIX) {
            match call_body(line) {
                Some(encoded) => match decode_extra(encoded) {
                    Ok(extra) => info.extra = extra,
                    Err(e) => warn!(%format, error = %e, "Skipping unreadable extra lyrics"),
                },
                None => warn!(%format, line, "Skipping malformed extra lyrics line"),
            }
        } else if line.starts_with(LINE_PREFIX) {
            match parse_call(line) {
                Some(call) => calls.push(call),
                None => warn!(%format, line, "Skipping malformed lyrics line"),
            }
        } else if let Some(content) = bracket_value(line, TAG_PREFIX) {
            match content.split_once(':') {
                Some((key, value)) => apply_tag(&mut info.tags, key, value, format),
                None => warn!(%format, line, "Skipping tag without a key"),
            }
        } else if let Some(content) = bracket_value(line, "[") {
            if let Some((key, value)) = content.split_once(':') {
                apply_tag(&mut info.tags, key, value, format);
            }
        }
    }
    calls
}

/// Fields are split on the exact `','`, first and last only, so the text
/// in the middle may hold quotes and commas.
fn parse_call(line: &str) -> Option<ScriptLine> {
    let body = call_body(line)?;
    let (times, rest) = body.split_once(CALL_SEPARATOR)?;
    let (text, markup) = rest.rsplit_once(CALL_SEPARATOR)?;

    let mut starts = Vec::new();
    for part in times.split(',') {
        match part.trim().parse::<i64>() {
            Ok(start) => starts.push(start),
            Err(_) => return None,
        }
    }

    Some(ScriptLine {
        starts,
        text: text.to_string(),
        durations: parse_word_timing(markup),
    })
}

/// Render header tags and the extra lyrics line
pub fn render_header(info: &LyricsInfo) -> Result<String> {
    let mut out = String::new();
    for (key, value) in tag_entries(&info.tags) {
        if HEADER_KEYS.contains(&key.as_str()) {
            out.push_str(&format!("[{}:{}];\n", key, value));
        } else {
            out.push_str(&format!("{}{}:{}];\n", TAG_PREFIX, key, value));
        }
    }
    out.push_str(&render_extra(&info.extra)?);
    Ok(out)
}

fn render_extra(extra: &ExtraLyrics) -> Result<String> {
    let encoded = encode_extra(extra, ExtraStyle::Haplayer)?;
    Ok(format!("{}('{}');\n", EXTRA_PREFIX, encoded))
}

/// Render one `haplayer.lrc(...)` call
pub fn render_call(starts: &[i64], text: &str, durations: &[i64]) -> String {
    let times: Vec<String> = starts.iter().map(|s| s.to_string()).collect();
    format!(
        "{}('{}','{}','{}');\n",
        LINE_PREFIX,
        times.join(","),
        text,
        word_timing_markup(durations)
    )
}

/// Compress the finished script
pub fn deflate(script: &str) -> Result<Vec<u8>> {
    compress(script)
}

fn format_name(format: LyricsFormat) -> &'static str {
    match format {
        LyricsFormat::Hrcs => "HRCS",
        _ => "HRCX",
    }
}
