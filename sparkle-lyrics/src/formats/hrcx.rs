//! HRCX: compressed, word-timed, repeated lines stored once
//!
//! A line sung several times is a single `haplayer.lrc` call listing every
//! start time. Reading expands it back into one line per start time.

use super::haplayer::{self, ScriptLine};
use super::{LyricsReader, LyricsWriter};
use crate::error::Result;
use crate::model::{LyricsFormat, LyricsInfo, LyricsLine};
use crate::words::{join_bracketed, split_bracketed};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct HrcxReader;

impl HrcxReader {
    pub fn new() -> Self {
        Self
    }
}

impl LyricsReader for HrcxReader {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Hrcx
    }

    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo> {
        let script = haplayer::inflate(data, LyricsFormat::Hrcx)?;
        let mut info = LyricsInfo::new(LyricsFormat::Hrcx);

        let calls = haplayer::parse_script(&script, &mut info);
        for call in calls {
            let words = split_bracketed(&call.text);
            let text = words.concat();
            for start in &call.starts {
                info.lines.push(LyricsLine::new(
                    *start,
                    &text,
                    words.clone(),
                    call.durations.clone(),
                ));
            }
        }

        info.sort_lines();
        Ok(info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HrcxWriter;

impl HrcxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Group lines with identical words and timing, in order of first use
    pub fn merge_repeated(lines: &[LyricsLine]) -> Vec<ScriptLine> {
        let mut merged: Vec<(Vec<String>, ScriptLine)> = Vec::new();
        for line in lines {
            let existing = merged.iter_mut().find(|(words, call)| {
                *words == line.words && call.durations == line.word_durations
            });
            match existing {
                Some((_, call)) => call.starts.push(line.start_time),
                None => merged.push((
                    line.words.clone(),
                    ScriptLine {
                        starts: vec![line.start_time],
                        text: join_bracketed(&line.words),
                        durations: line.word_durations.clone(),
                    },
                )),
            }
        }
        merged.into_iter().map(|(_, call)| call).collect()
    }

    pub fn render(info: &LyricsInfo) -> Result<String> {
        let mut out = haplayer::render_header(info)?;
        let calls = Self::merge_repeated(&info.lines);
        debug!(lines = info.lines.len(), records = calls.len(), "Merged repeated HRCX lines");
        for call in &calls {
            out.push_str(&haplayer::render_call(&call.starts, &call.text, &call.durations));
        }
        Ok(out)
    }
}

impl LyricsWriter for HrcxWriter {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Hrcx
    }

    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>> {
        haplayer::deflate(&Self::render(info)?)
    }
}
