//! KSC: karaoke script
//!
//! ```text
//! karaoke.songname('Song');
//! karaoke.singer('Singer');
//! karaoke.offset('0');
//! karaoke.tag('key:value');
//! karaoke.add('00:12.300','00:14.100','[hello]你','800,500,500');
//! ```
//!
//! Older files omit the end time: `karaoke.add('00:12.300','[hello]你','800,500,500');`

use super::{apply_tag, quoted_args, LyricsReader, LyricsWriter};
use crate::codec::decode_text;
use crate::error::{LyricsError, Result};
use crate::model::{LyricsFormat, LyricsInfo, LyricsLine};
use crate::words::{join_bracketed, split_bracketed};
use sparkle_common::human_time::{format_clock_millis, parse_clock_millis};
use tracing::{debug, warn};

const SONGNAME_PREFIX: &str = "karaoke.songname";
const SINGER_PREFIX: &str = "karaoke.singer";
const OFFSET_PREFIX: &str = "karaoke.offset";
const TAG_PREFIX: &str = "karaoke.tag";
const LINE_PREFIX: &str = "karaoke.add";

#[derive(Debug, Default, Clone, Copy)]
pub struct KscReader;

impl KscReader {
    pub fn new() -> Self {
        Self
    }

    /// Value of a header call, `name('value');` or `name := 'value';`
    fn header_value(line: &str) -> Option<String> {
        if let Some(args) = quoted_args(line) {
            return Some(args.join(","));
        }
        let (_, value) = line.split_once('=')?;
        let value = value.trim().trim_end_matches(';').trim();
        Some(value.trim_matches('\'').to_string())
    }

    fn parse_line(line: &str) -> Result<LyricsLine> {
        let args = quoted_args(line)
            .ok_or_else(|| LyricsError::malformed("KSC", "missing arguments"))?;

        let (start, end, text, timing) = match args.as_slice() {
            [start, end, text, timing] => (*start, Some(*end), *text, *timing),
            [start, text, timing] => (*start, None, *text, *timing),
            _ => {
                return Err(LyricsError::malformed(
                    "KSC",
                    format!("expected 3 or 4 fields, got {}", args.len()),
                ))
            }
        };

        let start = parse_clock_millis(start)?;
        let durations = timing
            .split(',')
            .filter(|d| !d.trim().is_empty())
            .map(|d| {
                d.trim()
                    .parse::<i64>()
                    .map_err(|_| {
                        LyricsError::malformed("KSC", format!("bad word duration '{}'", d))
                    })
            })
            .collect::<Result<Vec<i64>>>()?;

        let words = split_bracketed(text);
        if words.len() != durations.len() {
            debug!(
                words = words.len(),
                durations = durations.len(),
                text,
                "KSC word count differs from timing count"
            );
        }

        let plain = words.concat();
        let mut lyrics_line = LyricsLine::new(start, &plain, words, durations);
        if let Some(end) = end {
            lyrics_line.end_time = parse_clock_millis(end)?;
        }
        Ok(lyrics_line)
    }
}

impl LyricsReader for KscReader {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Ksc
    }

    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo> {
        let text = decode_text(data, "KSC");
        let mut info = LyricsInfo::new(LyricsFormat::Ksc);

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(LINE_PREFIX) {
                match Self::parse_line(line) {
                    Ok(lyrics_line) => info.lines.push(lyrics_line),
                    Err(e) => warn!(line, error = %e, "Skipping malformed KSC line"),
                }
            } else if line.starts_with(SONGNAME_PREFIX) {
                info.tags.title = Self::header_value(line);
            } else if line.starts_with(SINGER_PREFIX) {
                info.tags.artist = Self::header_value(line);
            } else if line.starts_with(OFFSET_PREFIX) {
                if let Some(value) = Self::header_value(line) {
                    apply_tag(&mut info.tags, "offset", &value, LyricsFormat::Ksc);
                }
            } else if line.starts_with(TAG_PREFIX) {
                match Self::header_value(line).as_deref().and_then(|v| v.split_once(':')) {
                    Some((key, value)) => apply_tag(&mut info.tags, key, value, LyricsFormat::Ksc),
                    None => warn!(line, "Skipping KSC tag without a key"),
                }
            }
        }

        info.sort_lines();
        Ok(info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KscWriter;

impl KscWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(info: &LyricsInfo) -> String {
        let tags = &info.tags;
        let mut out = String::new();

        if let Some(title) = &tags.title {
            out.push_str(&format!("{}('{}');\n", SONGNAME_PREFIX, title));
        }
        if let Some(artist) = &tags.artist {
            out.push_str(&format!("{}('{}');\n", SINGER_PREFIX, artist));
        }
        if let Some(offset) = tags.offset {
            out.push_str(&format!("{}('{}');\n", OFFSET_PREFIX, offset));
        }

        let mut tag = |key: &str, value: &str| {
            out.push_str(&format!("{}('{}:{}');\n", TAG_PREFIX, key, value));
        };
        if let Some(album) = &tags.album {
            tag("al", album);
        }
        if let Some(by) = &tags.by {
            tag("by", by);
        }
        if let Some(total) = tags.total {
            tag("total", &total.to_string());
        }
        for (key, value) in &tags.extra {
            tag(key, value);
        }

        for line in &info.lines {
            let durations: Vec<String> =
                line.word_durations.iter().map(|d| d.to_string()).collect();
            out.push_str(&format!(
                "{}('{}','{}','{}','{}');\n",
                LINE_PREFIX,
                format_clock_millis(line.start_time),
                format_clock_millis(line.end_time),
                join_bracketed(&line.words),
                durations.join(",")
            ));
        }
        out
    }
}

impl LyricsWriter for KscWriter {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Ksc
    }

    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>> {
        Ok(Self::render(info).into_bytes())
    }
}
