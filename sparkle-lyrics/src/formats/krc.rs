//! KRC: obfuscated, word-timed
//!
//! The file is `krc1` followed by a XOR-ed zlib stream (see [`crate::codec`]).
//! Decoded, it reads:
//!
//! ```text
//! [ti:Title]
//! [language:<base64 json>]
//! [1679,1550]<0,399,0>作<399,200,0>词<599,250,0>：
//! ```

use super::{apply_tag, tag_entries, LyricsReader, LyricsWriter};
use crate::codec::{decode_text, krc_decrypt, krc_encrypt};
use crate::error::{LyricsError, Result};
use crate::extra::{decode_extra, encode_extra, ExtraStyle};
use crate::model::{LyricsFormat, LyricsInfo, LyricsLine};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

const LANGUAGE_KEY: &str = "language";

static LINE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+)\s*,\s*(\d+)\](.*)$").expect("valid KRC line regex"));

static TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([A-Za-z][A-Za-z0-9_]*):(.*)\]$").expect("valid KRC tag regex")
});

static TIMED_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*-?\d+\s*,\s*(\d+)\s*,\s*-?\d+\s*>([^<]*)").expect("valid KRC word regex")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct KrcReader;

impl KrcReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the decrypted text
    pub fn parse_text(text: &str) -> Result<LyricsInfo> {
        let mut info = LyricsInfo::new(LyricsFormat::Krc);

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = LINE_HEADER.captures(line) {
                match Self::parse_line(&caps[1], &caps[2], &caps[3]) {
                    Ok(lyrics_line) => info.lines.push(lyrics_line),
                    Err(e) => warn!(line, error = %e, "Skipping malformed KRC line"),
                }
            } else if let Some(caps) = TAG_LINE.captures(line) {
                let (key, value) = (&caps[1], &caps[2]);
                if key.eq_ignore_ascii_case(LANGUAGE_KEY) {
                    if value.trim().is_empty() {
                        continue;
                    }
                    match decode_extra(value) {
                        Ok(extra) => info.extra = extra,
                        Err(e) => warn!(error = %e, "Skipping unreadable KRC language tag"),
                    }
                } else {
                    apply_tag(&mut info.tags, key, value, LyricsFormat::Krc);
                }
            }
        }

        info.sort_lines();
        Ok(info)
    }

    fn parse_line(start: &str, duration: &str, body: &str) -> Result<LyricsLine> {
        let start: i64 = start
            .parse()
            .map_err(|_| LyricsError::malformed("KRC", format!("bad start time '{}'", start)))?;
        let duration: i64 = duration.parse().map_err(|_| {
            LyricsError::malformed("KRC", format!("bad line duration '{}'", duration))
        })?;

        let mut words = Vec::new();
        let mut durations = Vec::new();
        for caps in TIMED_WORD.captures_iter(body) {
            let word_duration = caps[1]
                .parse::<i64>()
                .map_err(|_| LyricsError::malformed("KRC", "bad word duration"))?;
            durations.push(word_duration);
            words.push(caps[2].to_string());
        }

        let text = words.concat();
        let mut line = LyricsLine::new(start, &text, words, durations);
        line.end_time = start + duration;
        Ok(line)
    }
}

impl LyricsReader for KrcReader {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Krc
    }

    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo> {
        let decrypted = krc_decrypt(data)?;
        Self::parse_text(&decode_text(&decrypted, "KRC"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KrcWriter;

impl KrcWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the plain text that gets encrypted
    pub fn render(info: &LyricsInfo) -> Result<String> {
        let mut out = String::new();
        for (key, value) in tag_entries(&info.tags) {
            out.push_str(&format!("[{}:{}]\n", key, value));
        }
        out.push_str(&format!(
            "[{}:{}]\n",
            LANGUAGE_KEY,
            encode_extra(&info.extra, ExtraStyle::Krc)?
        ));

        for line in &info.lines {
            out.push_str(&format!("[{},{}]", line.start_time, line.duration()));
            let mut offset = 0;
            for (word, duration) in line.words.iter().zip(&line.word_durations) {
                out.push_str(&format!("<{},{},0>{}", offset, duration, word));
                offset += duration;
            }
            out.push('\n');
        }
        Ok(out)
    }
}

impl LyricsWriter for KrcWriter {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Krc
    }

    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>> {
        krc_encrypt(&Self::render(info)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base64_encode;
    use crate::model::TranslationLine;

    #[test]
    fn test_parse_text() {
        let json =
            r#"{"content":[{"language":0,"type":1,"lyricContent":[["Lyricist: Li Jian"]]}]}"#;
        let text = format!(
            "[id:$00000000]\n[ti:风吹麦浪]\n[ar:李健]\n[offset:0]\n[total:263000]\n[language:{}]\n\
[1679,1550]<0,399,0>作<399,200,0>词<599,250,0>：<849,301,0>李<1150,400,0>健\n\
[500,100]\n",
            base64_encode(json.as_bytes())
        );
        let info = KrcReader::parse_text(&text).unwrap();

        assert_eq!(info.tags.title.as_deref(), Some("风吹麦浪"));
        assert_eq!(info.tags.total, Some(263_000));
        assert_eq!(info.tags.extra.get("id").map(String::as_str), Some("$00000000"));
        assert_eq!(info.extra.translation[0].text, "Lyricist: Li Jian");

        assert_eq!(info.lines.len(), 2);
        let empty = &info.lines[0];
        assert!(empty.words.is_empty());
        assert_eq!(empty.end_time, 600);

        let line = &info.lines[1];
        assert_eq!(line.start_time, 1_679);
        assert_eq!(line.end_time, 3_229);
        assert_eq!(line.text, "作词：李健");
        assert_eq!(line.words, vec!["作", "词", "：", "李", "健"]);
        assert_eq!(line.word_durations, vec![399, 200, 250, 301, 400]);
    }

    #[test]
    fn test_words_keep_spaces() {
        let info = KrcReader::parse_text("[0,900]<0,400,0>Hello <400,500,0>world\n").unwrap();
        assert_eq!(info.lines[0].words, vec!["Hello ", "world"]);
        assert_eq!(info.lines[0].text, "Hello world");
    }

    #[test]
    fn test_round_trip() {
        let mut info = LyricsInfo::new(LyricsFormat::Krc);
        info.tags.title = Some("t".to_string());
        info.tags.offset = Some(-50);
        info.lines.push(LyricsLine::new(
            1_000,
            "作词",
            vec!["作".to_string(), "词".to_string()],
            vec![300, 200],
        ));
        info.extra.translation.push(TranslationLine::new("lyrics"));
        info.extra.transliteration.push(LyricsLine::new(
            0,
            "zuo ci",
            vec!["zuo".to_string(), "ci".to_string()],
            Vec::new(),
        ));

        let bytes = KrcWriter.to_bytes(&info).unwrap();
        assert_eq!(&bytes[..4], b"krc1");

        let reread = KrcReader.read_bytes(&bytes).unwrap();
        assert_eq!(reread, info);
    }

    #[test]
    fn test_rejects_missing_magic() {
        let err = KrcReader.read_bytes(b"[ti:plain text]").unwrap_err();
        assert!(matches!(err, LyricsError::Malformed { format: "KRC", .. }));
    }
}
