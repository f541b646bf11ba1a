//! Splitting lyrics text into timed units
//!
//! CJK, kana and hangul are timed one character at a time. Latin text is
//! timed per word. Karaoke formats mark multi-character units with `[...]`.

/// CJK ideographs and the punctuation blocks used alongside them
pub fn is_chinese(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0x3400..=0x4DBF    // CJK Unified Ideographs Extension A
        | 0xF900..=0xFAFF    // CJK Compatibility Ideographs
        | 0x2000..=0x206F    // General Punctuation
        | 0x3000..=0x303F    // CJK Symbols and Punctuation
        | 0xFF00..=0xFFEF    // Halfwidth and Fullwidth Forms
    )
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
}

pub fn is_ascii_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Characters that always form a unit of their own
fn is_single_char_unit(c: char) -> bool {
    is_chinese(c) || is_hangul_syllable(c) || is_hiragana(c)
}

/// Split untimed text (LRC): CJK chars stand alone, whitespace separates
/// everything else. Blank text yields a single empty word.
pub fn split_plain(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut words = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if is_single_char_unit(c) {
            flush(&mut current, &mut words);
            words.push(c.to_string());
        } else if c.is_whitespace() {
            flush(&mut current, &mut words);
        } else {
            current.push(c);
        }
    }
    flush(&mut current, &mut words);

    if words.is_empty() {
        words.push(text.to_string());
    }
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Split karaoke text (KSC/HRCX): `[...]` groups and runs of ASCII letters
/// are one unit each, any other character is a unit of its own.
pub fn split_bracketed(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut letters = String::new();
    let mut group: Option<String> = None;

    for c in text.chars() {
        if let Some(g) = group.as_mut() {
            if c == ']' {
                words.push(std::mem::take(g));
                group = None;
            } else {
                g.push(c);
            }
            continue;
        }

        if c == '[' {
            flush(&mut letters, &mut words);
            group = Some(String::new());
        } else if is_ascii_letter(c) {
            letters.push(c);
        } else {
            flush(&mut letters, &mut words);
            words.push(c.to_string());
        }
    }

    flush(&mut letters, &mut words);
    if let Some(g) = group {
        // unterminated group
        if !g.is_empty() {
            words.push(g);
        }
    }
    words
}

/// Render words so that `split_bracketed` gives them back
pub fn join_bracketed(words: &[String]) -> String {
    let mut out = String::new();
    for word in words {
        let needs_brackets = word.chars().count() > 1
            || (!word.is_empty() && word.chars().all(is_ascii_letter));
        if needs_brackets {
            out.push('[');
            out.push_str(word);
            out.push(']');
        } else {
            out.push_str(word);
        }
    }
    out
}

/// One unit per character (HRCS)
pub fn split_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_char_classes() {
        assert!(is_chinese('作'));
        assert!(is_chinese('，'));
        assert!(is_chinese('\u{3000}'));
        assert!(!is_chinese('a'));
        assert!(is_hiragana('あ'));
        assert!(is_katakana('カ'));
        assert!(!is_hiragana('カ'));
        assert!(is_hangul_syllable('한'));
    }

    #[test]
    fn test_split_plain_mixed() {
        assert_eq!(
            split_plain("我爱 you baby"),
            words(&["我", "爱", "you", "baby"])
        );
        assert_eq!(split_plain("사랑해"), words(&["사", "랑", "해"]));
        assert_eq!(split_plain("   "), words(&[""]));
        assert_eq!(split_plain(""), words(&[""]));
    }

    #[test]
    fn test_split_bracketed() {
        assert_eq!(
            split_bracketed("原来[you]是 me"),
            words(&["原", "来", "you", "是", " ", "me"])
        );
        assert_eq!(split_bracketed("[new york]!"), words(&["new york", "!"]));
        assert_eq!(split_bracketed("ab[cd"), words(&["ab", "cd"]));
    }

    #[test]
    fn test_join_bracketed_inverts_split() {
        let original = words(&["原", "来", "you", "a", " ", "new york"]);
        let rendered = join_bracketed(&original);
        assert_eq!(rendered, "原来[you][a] [new york]");
        assert_eq!(split_bracketed(&rendered), original);
    }

    #[test]
    fn test_split_chars() {
        assert_eq!(split_chars("作词"), words(&["作", "词"]));
        assert!(split_chars("").is_empty());
    }
}
