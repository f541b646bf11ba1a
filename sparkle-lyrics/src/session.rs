//! Lyrics lookup against the playback position
//!
//! All positions passed in are playback progress in milliseconds. The file's
//! `offset` tag is added before comparing with line times, and subtracted
//! again from the seek targets handed back.

use crate::model::{ExtraKind, LyricsInfo, LyricsLine, TranslationLine};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where playback is inside the lyrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WordProgress {
    pub line_index: usize,
    /// Index of the word being sung, `None` for a line without words
    pub word_index: Option<usize>,
    /// Elapsed share of the current word, `0.0..=1.0`
    pub fraction: f64,
}

/// A parsed lyrics file bound to the song playing
#[derive(Debug, Clone)]
pub struct LyricsSession {
    info: LyricsInfo,
    path: Option<PathBuf>,
}

impl LyricsSession {
    pub fn new(info: LyricsInfo, path: Option<PathBuf>) -> Self {
        Self { info, path }
    }

    pub fn info(&self) -> &LyricsInfo {
        &self.info
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[LyricsLine] {
        &self.info.lines
    }

    pub fn offset(&self) -> i64 {
        self.info.tags.offset_or_zero()
    }

    pub fn extra_kind(&self) -> ExtraKind {
        self.info.extra_kind()
    }

    /// Index of the line being sung: the last line starting at or before the
    /// adjusted position, or 0 before the first line
    pub fn line_index_at(&self, progress_ms: i64) -> Option<usize> {
        let lines = &self.info.lines;
        if lines.is_empty() {
            return None;
        }
        let position = progress_ms + self.offset();
        let after = lines.partition_point(|l| l.start_time <= position);
        Some(after.saturating_sub(1))
    }

    pub fn line_at(&self, progress_ms: i64) -> Option<&LyricsLine> {
        self.line_index_at(progress_ms)
            .and_then(|i| self.info.lines.get(i))
    }

    /// Line, word and word fraction at the position
    pub fn word_progress_at(&self, progress_ms: i64) -> Option<WordProgress> {
        let line_index = self.line_index_at(progress_ms)?;
        let line = &self.info.lines[line_index];
        let elapsed = progress_ms + self.offset() - line.start_time;

        if line.word_durations.is_empty() {
            return Some(WordProgress {
                line_index,
                word_index: None,
                fraction: if elapsed >= line.duration() && elapsed > 0 { 1.0 } else { 0.0 },
            });
        }

        if elapsed < 0 {
            return Some(WordProgress {
                line_index,
                word_index: Some(0),
                fraction: 0.0,
            });
        }

        let mut word_start = 0;
        for (index, duration) in line.word_durations.iter().enumerate() {
            let word_end = word_start + duration;
            if elapsed < word_end {
                let fraction = if *duration > 0 {
                    (elapsed - word_start) as f64 / *duration as f64
                } else {
                    1.0
                };
                return Some(WordProgress {
                    line_index,
                    word_index: Some(index),
                    fraction,
                });
            }
            word_start = word_end;
        }

        Some(WordProgress {
            line_index,
            word_index: Some(line.word_durations.len() - 1),
            fraction: 1.0,
        })
    }

    /// Playback position at which line `index` starts
    fn seek_target(&self, index: usize) -> i64 {
        (self.info.lines[index].start_time - self.offset()).max(0)
    }

    /// Seek target for the line before the current one (first line at the start)
    pub fn previous_line_start(&self, progress_ms: i64) -> Option<i64> {
        let current = self.line_index_at(progress_ms)?;
        Some(self.seek_target(current.saturating_sub(1)))
    }

    /// Seek target for the line after the current one (last line at the end)
    pub fn next_line_start(&self, progress_ms: i64) -> Option<i64> {
        let current = self.line_index_at(progress_ms)?;
        let position = progress_ms + self.offset();
        // before the first line the "next" line is the first one
        let next = if position < self.info.lines[0].start_time {
            0
        } else {
            (current + 1).min(self.info.lines.len() - 1)
        };
        Some(self.seek_target(next))
    }

    /// Translation aligned with line `index`
    pub fn translation_for(&self, index: usize) -> Option<&TranslationLine> {
        self.info.extra.translation.get(index)
    }

    /// Transliteration aligned with line `index`
    pub fn transliteration_for(&self, index: usize) -> Option<&LyricsLine> {
        self.info.extra.transliteration.get(index)
    }
}
