//! Lyrics data model shared by every format

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Supported lyrics file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsFormat {
    /// Line-timed plain text
    Lrc,
    /// Karaoke script (`karaoke.add(...)`)
    Ksc,
    /// Encrypted, word-timed
    Krc,
    /// Compressed, word-timed, repeated lines merged
    Hrcx,
    /// Compressed, char-timed
    Hrcs,
}

impl LyricsFormat {
    /// All formats in default lookup priority
    pub const ALL: [LyricsFormat; 5] = [
        LyricsFormat::Krc,
        LyricsFormat::Ksc,
        LyricsFormat::Hrcx,
        LyricsFormat::Hrcs,
        LyricsFormat::Lrc,
    ];

    /// File extension without the dot
    pub fn ext(self) -> &'static str {
        match self {
            LyricsFormat::Lrc => "lrc",
            LyricsFormat::Ksc => "ksc",
            LyricsFormat::Krc => "krc",
            LyricsFormat::Hrcx => "hrcx",
            LyricsFormat::Hrcs => "hrcs",
        }
    }

    /// Look a format up by extension (case-insensitive, leading dot allowed)
    pub fn from_ext(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|f| f.ext().eq_ignore_ascii_case(ext))
    }

    /// Whether lines carry real per-word timing
    pub fn is_word_timed(self) -> bool {
        !matches!(self, LyricsFormat::Lrc)
    }
}

impl fmt::Display for LyricsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LyricsFormat::Lrc => "LRC",
            LyricsFormat::Ksc => "KSC",
            LyricsFormat::Krc => "KRC",
            LyricsFormat::Hrcx => "HRCX",
            LyricsFormat::Hrcs => "HRCS",
        })
    }
}

/// Header tags of a lyrics file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Milliseconds added to the playback position before lookup
    pub offset: Option<i64>,
    /// Uploader
    pub by: Option<String>,
    /// Song length in milliseconds
    pub total: Option<i64>,
    /// Any other `key:value` tag, ordered by key
    pub extra: BTreeMap<String, String>,
}

impl LyricsTags {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.offset.is_none()
            && self.by.is_none()
            && self.total.is_none()
            && self.extra.is_empty()
    }

    pub fn offset_or_zero(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

/// One timed lyrics line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsLine {
    /// Start time (ms)
    pub start_time: i64,
    /// End time (ms)
    pub end_time: i64,
    /// Full line text
    pub text: String,
    /// Line split into the units that are timed
    pub words: Vec<String>,
    /// Duration of each word (ms), parallel to `words`
    pub word_durations: Vec<i64>,
}

impl LyricsLine {
    /// Build a word-timed line; `end_time` is the start plus all durations
    pub fn new(start_time: i64, text: &str, words: Vec<String>, word_durations: Vec<i64>) -> Self {
        let end_time = start_time + word_durations.iter().sum::<i64>();
        let mut line = Self {
            start_time,
            end_time,
            text: String::new(),
            words: Vec::new(),
            word_durations,
        };
        line.set_text(text);
        line.set_words(words);
        line
    }

    /// Set the text, dropping any CR/LF
    pub fn set_text(&mut self, text: &str) {
        self.text = strip_newlines(text);
    }

    /// Set the words, dropping any CR/LF inside them
    pub fn set_words(&mut self, words: Vec<String>) {
        self.words = words.into_iter().map(|w| strip_newlines(&w)).collect();
    }

    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Offset of word `index` from the line start (ms)
    pub fn word_start(&self, index: usize) -> i64 {
        self.word_durations.iter().take(index).sum()
    }
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// One translated line (untimed, aligned with the main lines by index)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLine {
    pub text: String,
}

impl TranslationLine {
    pub fn new(text: &str) -> Self {
        Self {
            text: strip_newlines(text),
        }
    }
}

/// Translation and transliteration carried alongside the main lyrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraLyrics {
    pub translation: Vec<TranslationLine>,
    pub transliteration: Vec<LyricsLine>,
}

impl ExtraLyrics {
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty() && self.transliteration.is_empty()
    }

    pub fn kind(&self) -> ExtraKind {
        match (self.translation.is_empty(), self.transliteration.is_empty()) {
            (true, true) => ExtraKind::None,
            (false, true) => ExtraKind::Translation,
            (true, false) => ExtraKind::Transliteration,
            (false, false) => ExtraKind::Both,
        }
    }
}

/// Which extra lyrics a file provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraKind {
    None,
    Translation,
    Transliteration,
    Both,
}

impl ExtraKind {
    pub fn has_translation(self) -> bool {
        matches!(self, ExtraKind::Translation | ExtraKind::Both)
    }

    pub fn has_transliteration(self) -> bool {
        matches!(self, ExtraKind::Transliteration | ExtraKind::Both)
    }
}

/// A fully parsed lyrics file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsInfo {
    /// Format the lyrics were read from (or will be written as)
    pub format: LyricsFormat,
    pub tags: LyricsTags,
    /// Lines ordered by start time
    pub lines: Vec<LyricsLine>,
    pub extra: ExtraLyrics,
}

impl LyricsInfo {
    pub fn new(format: LyricsFormat) -> Self {
        Self {
            format,
            tags: LyricsTags::default(),
            lines: Vec::new(),
            extra: ExtraLyrics::default(),
        }
    }

    pub fn extra_kind(&self) -> ExtraKind {
        self.extra.kind()
    }

    /// Stable sort of the lines by start time
    pub fn sort_lines(&mut self) {
        self.lines.sort_by_key(|l| l.start_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_ext() {
        assert_eq!(LyricsFormat::from_ext("KRC"), Some(LyricsFormat::Krc));
        assert_eq!(LyricsFormat::from_ext(".ksc"), Some(LyricsFormat::Ksc));
        assert_eq!(LyricsFormat::from_ext("hrcs"), Some(LyricsFormat::Hrcs));
        assert_eq!(LyricsFormat::from_ext("txt"), None);
        assert_eq!(LyricsFormat::from_ext(""), None);
    }

    #[test]
    fn test_only_lrc_is_line_timed() {
        assert!(!LyricsFormat::Lrc.is_word_timed());
        assert!(LyricsFormat::Krc.is_word_timed());
        assert!(LyricsFormat::Hrcs.is_word_timed());
    }

    #[test]
    fn test_line_new_computes_end_and_strips_newlines() {
        let line = LyricsLine::new(
            1000,
            "hello\r\nworld",
            vec!["hel\nlo".to_string(), "world".to_string()],
            vec![300, 200],
        );
        assert_eq!(line.end_time, 1500);
        assert_eq!(line.duration(), 500);
        assert_eq!(line.text, "helloworld");
        assert_eq!(line.words[0], "hello");
        assert_eq!(line.word_start(0), 0);
        assert_eq!(line.word_start(1), 300);
        assert_eq!(line.word_start(2), 500);
    }

    #[test]
    fn test_extra_kind() {
        let mut extra = ExtraLyrics::default();
        assert_eq!(extra.kind(), ExtraKind::None);

        extra.translation.push(TranslationLine::new("hi"));
        assert_eq!(extra.kind(), ExtraKind::Translation);
        assert!(extra.kind().has_translation());

        extra.transliteration.push(LyricsLine::default());
        assert_eq!(extra.kind(), ExtraKind::Both);
        assert!(extra.kind().has_transliteration());
    }

    #[test]
    fn test_sort_lines_is_stable() {
        let mut info = LyricsInfo::new(LyricsFormat::Lrc);
        info.lines.push(LyricsLine::new(500, "b", vec![], vec![]));
        info.lines.push(LyricsLine::new(100, "a", vec![], vec![]));
        info.lines.push(LyricsLine::new(500, "c", vec![], vec![]));
        info.sort_lines();

        let texts: Vec<&str> = info.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
