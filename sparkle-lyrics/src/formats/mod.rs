//! Lyrics file readers and writers
//!
//! Every format implements [`LyricsReader`] and [`LyricsWriter`]. Only the
//! byte-level `read_bytes` / `to_bytes` differ between formats; file and
//! Base64 handling is shared through the provided trait methods.

pub mod haplayer;
pub mod hrcs;
pub mod hrcx;
pub mod krc;
pub mod ksc;
pub mod lrc;

pub use hrcs::{HrcsReader, HrcsWriter};
pub use hrcx::{HrcxReader, HrcxWriter};
pub use krc::{KrcReader, KrcWriter};
pub use ksc::{KscReader, KscWriter};
pub use lrc::{LrcReader, LrcWriter};

use crate::codec::base64_decode;
use crate::error::Result;
use crate::model::{LyricsFormat, LyricsInfo, LyricsTags};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Parses one lyrics format
pub trait LyricsReader: Send + Sync {
    fn format(&self) -> LyricsFormat;

    /// Whether this reader handles the extension (case-insensitive, dot optional)
    fn supports(&self, ext: &str) -> bool {
        LyricsFormat::from_ext(ext) == Some(self.format())
    }

    /// Parse raw file content
    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo>;

    fn read_reader(&self, reader: &mut dyn Read) -> Result<LyricsInfo> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.read_bytes(&data)
    }

    fn read_file(&self, path: &Path) -> Result<LyricsInfo> {
        let data = std::fs::read(path)?;
        let info = self.read_bytes(&data)?;
        debug!(
            file = %path.display(),
            format = %self.format(),
            lines = info.lines.len(),
            "Read lyrics file"
        );
        Ok(info)
    }

    /// Parse Base64-encoded file content, optionally keeping the decoded file
    fn read_base64(&self, encoded: &str, save_to: Option<&Path>) -> Result<LyricsInfo> {
        let data = base64_decode(encoded)?;
        self.read_and_save(&data, save_to)
    }

    /// Parse raw content and, when it parses, store it verbatim at `save_to`
    fn read_and_save(&self, data: &[u8], save_to: Option<&Path>) -> Result<LyricsInfo> {
        let info = self.read_bytes(data)?;
        if let Some(path) = save_to {
            ensure_parent_dir(path)?;
            std::fs::write(path, data)?;
            debug!(file = %path.display(), "Saved downloaded lyrics");
        }
        Ok(info)
    }
}

/// Serialises one lyrics format
pub trait LyricsWriter: Send + Sync {
    fn format(&self) -> LyricsFormat;

    fn supports(&self, ext: &str) -> bool {
        LyricsFormat::from_ext(ext) == Some(self.format())
    }

    /// Render the complete file content
    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>>;

    /// Write the file, creating parent directories as needed
    fn write_file(&self, info: &LyricsInfo, path: &Path) -> Result<()> {
        let bytes = self.to_bytes(info)?;
        ensure_parent_dir(path)?;
        std::fs::write(path, bytes)?;
        debug!(
            file = %path.display(),
            format = %self.format(),
            lines = info.lines.len(),
            "Wrote lyrics file"
        );
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

static QUOTED_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'\s*,\s*'").expect("valid separator regex"));

/// Everything between the opening `('` and the closing `')` of a call line
pub(crate) fn call_body(line: &str) -> Option<&str> {
    let start = line.find("('")? + 2;
    let end = line.rfind("')")?;
    if end < start {
        return None;
    }
    Some(&line[start..end])
}

/// Arguments of a `name('a', 'b', ...)` call line, spaces around commas allowed
pub(crate) fn quoted_args(line: &str) -> Option<Vec<&str>> {
    Some(QUOTED_SEPARATOR.split(call_body(line)?).collect())
}

/// Content between `prefix` and the last `]` of the line
pub(crate) fn bracket_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    let end = rest.rfind(']')?;
    Some(&rest[..end])
}

/// Store a `key:value` tag, mapping the well-known keys onto fields
pub(crate) fn apply_tag(tags: &mut LyricsTags, key: &str, value: &str, format: LyricsFormat) {
    match key.trim().to_ascii_lowercase().as_str() {
        "ti" => tags.title = Some(value.to_string()),
        "ar" => tags.artist = Some(value.to_string()),
        "al" => tags.album = Some(value.to_string()),
        "by" => tags.by = Some(value.to_string()),
        "offset" => match value.trim().parse::<i64>() {
            Ok(v) => tags.offset = Some(v),
            Err(_) => warn!(%format, value, "Ignoring non-numeric offset tag"),
        },
        "total" => match value.trim().parse::<i64>() {
            Ok(v) => tags.total = Some(v),
            Err(_) => warn!(%format, value, "Ignoring non-numeric total tag"),
        },
        _ => {
            tags.extra.insert(key.trim().to_string(), value.to_string());
        }
    }
}

/// Tags as `(key, value)` in the order writers emit them
pub(crate) fn tag_entries(tags: &LyricsTags) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        if let Some(v) = value {
            entries.push((key.to_string(), v));
        }
    };
    push("ti", tags.title.clone());
    push("ar", tags.artist.clone());
    push("al", tags.album.clone());
    push("offset", tags.offset.map(|v| v.to_string()));
    push("by", tags.by.clone());
    push("total", tags.total.map(|v| v.to_string()));
    for (key, value) in &tags.extra {
        entries.push((key.clone(), value.clone()));
    }
    entries
}

/// `<offset,duration,0>` markup for a list of word durations
pub(crate) fn word_timing_markup(durations: &[i64]) -> String {
    let mut out = String::new();
    let mut offset = 0;
    for duration in durations {
        out.push_str(&format!("<{},{},0>", offset, duration));
        offset += duration;
    }
    out
}

static WORD_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(-?\d+)\s*,\s*(\d+)\s*(?:,\s*-?\d+\s*)?>").expect("valid word timing regex")
});

/// Durations out of `<offset,duration,0>` markup
pub(crate) fn parse_word_timing(markup: &str) -> Vec<i64> {
    WORD_TIMING
        .captures_iter(markup)
        .filter_map(|c| c[2].parse::<i64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_args() {
        let args =
            quoted_args("karaoke.add('00:01.000', '00:02.000', '作词', '500,500');").unwrap();
        assert_eq!(args, vec!["00:01.000", "00:02.000", "作词", "500,500"]);
        assert!(quoted_args("karaoke.add()").is_none());
    }

    #[test]
    fn test_call_body() {
        assert_eq!(call_body("f('a', 'b');"), Some("a', 'b"));
        assert_eq!(call_body("f('it')s')"), Some("it')s"));
        assert_eq!(call_body("f()"), None);
    }

    #[test]
    fn test_bracket_value() {
        assert_eq!(bracket_value("[ti:Song]", "[ti:"), Some("Song"));
        assert_eq!(bracket_value("[ti:Song [live]];", "[ti:"), Some("Song [live]"));
        assert_eq!(bracket_value("[ar:x", "[ar:"), None);
    }

    #[test]
    fn test_apply_tag_and_entries() {
        let mut tags = LyricsTags::default();
        apply_tag(&mut tags, "ti", "Title", LyricsFormat::Lrc);
        apply_tag(&mut tags, "OFFSET", " -200 ", LyricsFormat::Lrc);
        apply_tag(&mut tags, "total", "abc", LyricsFormat::Lrc);
        apply_tag(&mut tags, "hash", "1234", LyricsFormat::Lrc);

        assert_eq!(tags.title.as_deref(), Some("Title"));
        assert_eq!(tags.offset, Some(-200));
        assert_eq!(tags.total, None);
        assert_eq!(tags.extra.get("hash").map(String::as_str), Some("1234"));

        let entries = tag_entries(&tags);
        assert_eq!(
            entries,
            vec![
                ("ti".to_string(), "Title".to_string()),
                ("offset".to_string(), "-200".to_string()),
                ("hash".to_string(), "1234".to_string()),
            ]
        );
    }

    #[test]
    fn test_word_timing_markup() {
        let markup = word_timing_markup(&[399, 200, 250]);
        assert_eq!(markup, "<0,399,0><399,200,0><599,250,0>");
        assert_eq!(parse_word_timing(&markup), vec![399, 200, 250]);
        assert_eq!(parse_word_timing("<0, 10, 0>x<10,20>"), vec![10, 20]);
    }
}
