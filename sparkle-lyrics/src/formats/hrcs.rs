//! HRCS: compressed, timed one character at a time

use super::haplayer;
use super::{LyricsReader, LyricsWriter};
use crate::error::Result;
use crate::model::{LyricsFormat, LyricsInfo, LyricsLine};
use crate::words::split_chars;
use tracing::warn;

#[derive(Debug, Default, Clone, Copy)]
pub struct HrcsReader;

impl HrcsReader {
    pub fn new() -> Self {
        Self
    }
}

impl LyricsReader for HrcsReader {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Hrcs
    }

    fn read_bytes(&self, data: &[u8]) -> Result<LyricsInfo> {
        let script = haplayer::inflate(data, LyricsFormat::Hrcs)?;
        let mut info = LyricsInfo::new(LyricsFormat::Hrcs);

        for call in haplayer::parse_script(&script, &mut info) {
            let Some(start) = call.starts.first().copied() else {
                continue;
            };
            if call.starts.len() > 1 {
                warn!(text = %call.text, "HRCS line lists several start times, using the first");
            }
            let words = split_chars(&call.text);
            info.lines
                .push(LyricsLine::new(start, &call.text, words, call.durations));
        }

        info.sort_lines();
        Ok(info)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HrcsWriter;

impl HrcsWriter {
    pub fn new() -> Self {
        Self
    }

    /// One duration per character. A longer word shares its duration
    /// between its characters, the last one taking the remainder.
    pub fn char_durations(line: &LyricsLine) -> Vec<i64> {
        if line.words.len() != line.word_durations.len() {
            warn!(
                text = %line.text,
                words = line.words.len(),
                durations = line.word_durations.len(),
                "Word count differs from timing count, writing HRCS timing unchanged"
            );
            return line.word_durations.clone();
        }

        let mut durations = Vec::new();
        let mut carry = 0;
        for (word, duration) in line.words.iter().zip(&line.word_durations) {
            let chars = word.chars().count() as i64;
            if chars == 0 {
                carry += duration;
                continue;
            }
            let total = duration + carry;
            carry = 0;
            let share = total / chars;
            durations.extend(std::iter::repeat(share).take(chars as usize - 1));
            durations.push(total - share * (chars - 1));
        }
        if let Some(last) = durations.last_mut() {
            *last += carry;
        }
        durations
    }

    pub fn render(info: &LyricsInfo) -> Result<String> {
        let mut out = haplayer::render_header(info)?;
        for line in &info.lines {
            out.push_str(&haplayer::render_call(
                &[line.start_time],
                &line.words.concat(),
                &Self::char_durations(line),
            ));
        }
        Ok(out)
    }
}

impl LyricsWriter for HrcsWriter {
    fn format(&self) -> LyricsFormat {
        LyricsFormat::Hrcs
    }

    fn to_bytes(&self, info: &LyricsInfo) -> Result<Vec<u8>> {
        haplayer::deflate(&Self::render(info)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress;

    fn line(start: i64, text: &str, durations: &[i64]) -> LyricsLine {
        LyricsLine::new(start, text, split_chars(text), durations.to_vec())
    }

    #[test]
    fn test_round_trip() {
        let mut info = LyricsInfo::new(LyricsFormat::Hrcs);
        info.tags.artist = Some("歌手".to_string());
        info.tags.offset = Some(-200);
        info.tags.extra.insert("source".to_string(), "cd".to_string());
        info.lines = vec![
            line(800, "天空", &[200, 250]),
            line(3_000, "ok", &[100, 100]),
        ];
        info.extra.transliteration = vec![LyricsLine::new(
            0,
            "tian kong",
            vec!["tian".to_string(), "kong".to_string()],
            Vec::new(),
        )];

        let bytes = HrcsWriter.to_bytes(&info).unwrap();
        let reread = HrcsReader.read_bytes(&bytes).unwrap();

        assert_eq!(reread.tags, info.tags);
        assert_eq!(reread.lines, info.lines);
        assert_eq!(reread.extra, info.extra);
    }

    #[test]
    fn test_multi_char_words_share_their_duration() {
        let mut info = LyricsInfo::new(LyricsFormat::Krc);
        info.lines = vec![LyricsLine::new(
            1_000,
            "Hello world",
            vec!["Hello ".to_string(), "world".to_string()],
            vec![400, 500],
        )];

        let reread = HrcsReader.read_bytes(&HrcsWriter.to_bytes(&info).unwrap()).unwrap();
        let line = &reread.lines[0];
        assert_eq!(line.words.len(), 11);
        assert_eq!(line.word_durations, vec![66, 66, 66, 66, 66, 70, 100, 100, 100, 100, 100]);
        assert_eq!(line.end_time, 1_900);
    }

    #[test]
    fn test_empty_word_passes_duration_on() {
        let line = LyricsLine::new(
            0,
            "ab",
            vec!["a".to_string(), String::new(), "b".to_string()],
            vec![100, 50, 100],
        );
        assert_eq!(HrcsWriter::char_durations(&line), vec![100, 150]);
    }

    #[test]
    fn test_read_sorts_and_splits_chars() {
        let script = "haplayer.lrc('5000','ab','<0,10,0><10,20,0>');\n\
haplayer.lrc('1000','天','<0,300,0>');\n";
        let info = HrcsReader.read_bytes(&compress(script).unwrap()).unwrap();

        assert_eq!(info.lines[0].start_time, 1_000);
        assert_eq!(info.lines[0].end_time, 1_300);
        assert_eq!(info.lines[1].words, vec!["a", "b"]);
        assert_eq!(info.lines[1].word_durations, vec![10, 20]);
    }

    #[test]
    fn test_extra_line_uses_lyric_type_key() {
        let mut info = LyricsInfo::new(LyricsFormat::Hrcs);
        info.extra
            .translation
            .push(crate::model::TranslationLine::new("hi"));
        let script = HrcsWriter::render(&info).unwrap();
        let encoded = script
            .lines()
            .find(|l| l.starts_with("haplayer.extra.lrc('"))
            .and_then(|l| l.strip_prefix("haplayer.extra.lrc('"))
            .and_then(|l| l.strip_suffix("');"))
            .unwrap();
        let json = String::from_utf8(crate::codec::base64_decode(encoded).unwrap()).unwrap();
        assert!(json.contains("\"lyricType\":1"));
    }
}
