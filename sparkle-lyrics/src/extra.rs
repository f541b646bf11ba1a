//! Translation / transliteration side channel
//!
//! Word-timed formats embed a Base64 JSON document:
//!
//! ```json
//! {"content":[{"type":1,"language":0,"lyricContent":[["line one"],["line two"]]}]}
//! ```
//!
//! Type 1 rows hold a translated line in element 0, type 0 rows hold the
//! transliterated words. KRC names the discriminator `type`, the haplayer
//! formats (HRCX/HRCS) name it `lyricType`.

use crate::codec::{base64_decode, base64_encode};
use crate::error::Result;
use crate::model::{ExtraLyrics, LyricsLine, TranslationLine};
use serde::Deserialize;
use serde_json::{json, Value};

const TYPE_TRANSLITERATION: i64 = 0;
const TYPE_TRANSLATION: i64 = 1;

/// Key layout of the JSON entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraStyle {
    /// `{"language":0,"type":N,...}`
    Krc,
    /// `{"lyricType":N,...}`
    Haplayer,
}

#[derive(Debug, Deserialize)]
struct ExtraDocument {
    #[serde(default)]
    content: Vec<ExtraEntry>,
}

#[derive(Debug, Deserialize)]
struct ExtraEntry {
    #[serde(rename = "type", alias = "lyricType")]
    kind: i64,
    #[serde(rename = "lyricContent", default)]
    lyric_content: Vec<Vec<String>>,
}

/// Decode the Base64 JSON payload into extra lyrics
pub fn decode_extra(encoded: &str) -> Result<ExtraLyrics> {
    let bytes = base64_decode(encoded)?;
    let document: ExtraDocument = serde_json::from_slice(&bytes)?;

    let mut extra = ExtraLyrics::default();
    for entry in document.content {
        match entry.kind {
            TYPE_TRANSLATION => {
                extra.translation = entry
                    .lyric_content
                    .iter()
                    .filter_map(|row| row.first())
                    .map(|text| TranslationLine::new(text))
                    .collect();
            }
            TYPE_TRANSLITERATION => {
                extra.transliteration = entry
                    .lyric_content
                    .into_iter()
                    .filter(|row| !row.is_empty())
                    .map(|row| {
                        let text = row.join(" ");
                        LyricsLine::new(0, &text, row, Vec::new())
                    })
                    .collect();
            }
            other => {
                tracing::debug!(kind = other, "Ignoring unknown extra lyrics type");
            }
        }
    }
    Ok(extra)
}

/// Encode extra lyrics as Base64 JSON in the given style
pub fn encode_extra(extra: &ExtraLyrics, style: ExtraStyle) -> Result<String> {
    let mut content = Vec::new();

    if !extra.translation.is_empty() {
        let rows: Vec<Value> = extra
            .translation
            .iter()
            .map(|line| json!([line.text]))
            .collect();
        content.push(entry(style, TYPE_TRANSLATION, rows));
    }

    if !extra.transliteration.is_empty() {
        let rows: Vec<Value> = extra
            .transliteration
            .iter()
            .map(|line| {
                let words: Vec<&str> = line.words.iter().map(|w| w.trim()).collect();
                json!(words)
            })
            .collect();
        content.push(entry(style, TYPE_TRANSLITERATION, rows));
    }

    let document = json!({ "content": content });
    Ok(base64_encode(serde_json::to_string(&document)?.as_bytes()))
}

fn entry(style: ExtraStyle, kind: i64, rows: Vec<Value>) -> Value {
    match style {
        ExtraStyle::Krc => json!({ "language": 0, "type": kind, "lyricContent": rows }),
        ExtraStyle::Haplayer => json!({ "lyricType": kind, "lyricContent": rows }),
    }
}
