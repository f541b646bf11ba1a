//! LRC: line-timed plain text
//!
//! ```text
//! [ti:Title]
//! [ar:Artist]
//! [00:12.30][01:40.00]a line sung twice
//! ```
//!
//! LRC carries no word timing. Each word is given a nominal 1000 ms so that
//! word-level consumers still have something to animate.

use super::{apply_tag, tag_entries, LyricsReader, LyricsWriter};
use crate::codec::decode_text;
use crate::error::Result;
use crate::model::{LyricsFormat, LyricsInfo, LyricsLine};
use crate::words::split_plain;
use once_cell::sync::Lazy;
use regex::Regex;
use sparkle_common::human_time::parse_fraction;
use tracing::{debug, warn};

/// Nominal duration given to every word of an LRC line
pub const DEFAULT_WORD_DURATION_MS: i64 = 1000;

static TIME_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+):(\d{1,2})(?:[.:](\d{1,3}))?\]").expect("valid time tag regex")
});

static INFO_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([A-Za-z][A-Za-z0-9_]*):(.*)\]$").expect("valid info tag regex")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct LrcReader;

impl LrcReader {
    pub fn new() -> Self {
        Self
    }

    /// Leading time tags of a line (ms) and the remaining text
    fn split_time_tags(line: &str) -> Result<(Vec<i64>, &str)> {
        let mut times = Vec::new();
        let mut rest = line;
        while let Some(caps) = TIME_TAG.captures(rest) {
            let minutes: i64 = caps[1].parse().unwrap_or(0);
            let seconds: i64 = caps[2].parse().unwrap_or(0);
            let fraction = match caps.get(3) {
                Some(m) => parse_fraction(m.as_str(), line)?,
                None => 0,
            };
            times.push((minutes * 60 + seconds) * 1000 + fraction);
            rest = &rest[caps[0].len()..];
        }
        Ok((times, rest.trim()))
    }
}

impl LyricsReader for LrcReader {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Lrc
    }

    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo> {
        let text = decode_text(data, "LRC");
        let mut info = LyricsInfo::new(LyricsFormat::Lrc);

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let (times, lyric) = match Self::split_time_tags(line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(line, error = %e, "Skipping LRC line with bad timestamp");
                    continue;
                }
            };

            if !times.is_empty() {
                let words = split_plain(lyric);
                let durations = vec![DEFAULT_WORD_DURATION_MS; words.len()];
                for start in times {
                    info.lines
                        .push(LyricsLine::new(start, lyric, words.clone(), durations.clone()));
                }
            } else if let Some(caps) = INFO_TAG.captures(line) {
                apply_tag(&mut info.tags, &caps[1], &caps[2], LyricsFormat::Lrc);
            } else {
                debug!(line, "Ignoring untimed LRC line");
            }
        }

        info.sort_lines();
        Ok(info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LrcWriter;

impl LrcWriter {
    pub fn new() -> Self {
        Self
    }

    /// `[mm:ss.xx]` with centisecond precision
    pub fn format_time_tag(millis: i64) -> String {
        let millis = millis.max(0);
        let total_seconds = millis / 1000;
        format!(
            "[{:02}:{:02}.{:02}]",
            total_seconds / 60,
            total_seconds % 60,
            (millis % 1000) / 10
        )
    }

    pub fn render(info: &LyricsInfo) -> String {
        let mut out = String::new();
        for (key, value) in tag_entries(&info.tags) {
            out.push_str(&format!("[{}:{}]\n", key, value));
        }
        for line in &info.lines {
            out.push_str(&Self::format_time_tag(line.start_time));
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

impl LyricsWriter for LrcWriter {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Lrc
    }

    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>> {
        Ok(Self::render(info).into_bytes())
    }
}
