//! Integration tests for reading, writing and converting lyrics files

use sparkle_lyrics::codec::{base64_encode, krc_encrypt};
use sparkle_lyrics::formats::{KrcReader, KscReader, LrcReader};
use sparkle_lyrics::{
    LyricsFormat, LyricsInfo, LyricsIo, LyricsLine, LyricsReader, LyricsSession, TranslationLine,
};
use tempfile::TempDir;

/// Word-timed lyrics with every kind of tag and both extra sections
fn karaoke_sample() -> LyricsInfo {
    let mut info = LyricsInfo::new(LyricsFormat::Krc);
    info.tags.title = Some("风吹麦浪".to_string());
    info.tags.artist = Some("李健".to_string());
    info.tags.album = Some("似水流年".to_string());
    info.tags.offset = Some(-100);
    info.tags.by = Some("sparkle".to_string());
    info.tags.total = Some(263_000);
    info.tags.extra.insert("hash".to_string(), "abc123".to_string());

    let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
    info.lines = vec![
        LyricsLine::new(1_679, "作词李健", words(&["作", "词", "李", "健"]), vec![399, 200, 301, 400]),
        LyricsLine::new(5_000, "远处蔚蓝天空", words(&["远", "处", "蔚", "蓝", "天", "空"]), vec![300; 6]),
        LyricsLine::new(9_000, "作词李健", words(&["作", "词", "李", "健"]), vec![399, 200, 301, 400]),
    ];
    info.extra.translation = vec![
        TranslationLine::new("Lyrics: Li Jian"),
        TranslationLine::new("Blue sky far away"),
        TranslationLine::new("Lyrics: Li Jian"),
    ];
    info.extra.transliteration = vec![
        LyricsLine::new(0, "zuo ci li jian", words(&["zuo", "ci", "li", "jian"]), Vec::new()),
        LyricsLine::new(0, "yuan chu", words(&["yuan", "chu"]), Vec::new()),
        LyricsLine::new(0, "zuo ci li jian", words(&["zuo", "ci", "li", "jian"]), Vec::new()),
    ];
    info
}

#[test]
fn test_word_timed_formats_preserve_content() {
    let dir = TempDir::new().unwrap();
    let io = LyricsIo::new();
    let sample = karaoke_sample();

    for ext in ["krc", "hrcx", "hrcs"] {
        let path = dir.path().join(format!("song.{}", ext));
        io.write_path(&sample, &path).unwrap();
        let reread = io.read_path(&path).unwrap();

        assert_eq!(reread.format, LyricsFormat::from_ext(ext).unwrap(), "{}", ext);
        assert_eq!(reread.tags, sample.tags, "{}", ext);
        assert_eq!(reread.lines, sample.lines, "{}", ext);
        assert_eq!(reread.extra, sample.extra, "{}", ext);
    }
}

#[test]
fn test_ksc_preserves_lines_and_tags() {
    let dir = TempDir::new().unwrap();
    let io = LyricsIo::new();
    let sample = karaoke_sample();

    let path = dir.path().join("song.ksc");
    io.write_path(&sample, &path).unwrap();
    let reread = io.read_path(&path).unwrap();

    assert_eq!(reread.tags, sample.tags);
    assert_eq!(reread.lines, sample.lines);
    // KSC has no side channel for extra lyrics
    assert!(reread.extra.is_empty());
}

#[test]
fn test_lrc_keeps_start_times_and_text() {
    let dir = TempDir::new().unwrap();
    let io = LyricsIo::new();
    let sample = karaoke_sample();

    let path = dir.path().join("song.lrc");
    io.write_path(&sample, &path).unwrap();
    let reread = io.read_path(&path).unwrap();

    let expected: Vec<(i64, &str)> = vec![(1_670, "作词李健"), (5_000, "远处蔚蓝天空"), (9_000, "作词李健")];
    let actual: Vec<(i64, &str)> = reread
        .lines
        .iter()
        .map(|l| (l.start_time, l.text.as_str()))
        .collect();
    // centisecond precision
    assert_eq!(actual, expected);
    assert!(reread.lines.iter().all(|l| l.word_durations.iter().all(|d| *d == 1000)));
}

#[test]
fn test_hrcx_file_merges_repeated_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.hrcx");
    LyricsIo::new().write_path(&karaoke_sample(), &path).unwrap();

    let script = sparkle_lyrics::codec::decompress(&std::fs::read(&path).unwrap()).unwrap();
    let script = String::from_utf8(script).unwrap();
    let calls: Vec<&str> = script.lines().filter(|l| l.starts_with("haplayer.lrc(")).collect();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("haplayer.lrc('1679,9000',"));
}

#[test]
fn test_convert_between_all_formats() {
    let dir = TempDir::new().unwrap();
    let io = LyricsIo::global();
    let src = dir.path().join("source.krc");
    io.write_path(&karaoke_sample(), &src).unwrap();

    let mut previous = src;
    for ext in ["ksc", "hrcx", "hrcs", "krc"] {
        let dst = dir.path().join(format!("step.{}", ext));
        io.convert(&previous, &dst).unwrap();
        previous = dst;
    }

    let final_info = io.read_path(&previous).unwrap();
    let sample = karaoke_sample();
    assert_eq!(final_info.tags, sample.tags);
    assert_eq!(final_info.lines, sample.lines);
}

#[test]
fn test_convert_to_hrcs_times_every_character() {
    let dir = TempDir::new().unwrap();
    let io = LyricsIo::new();
    let mut info = LyricsInfo::new(LyricsFormat::Krc);
    info.lines = vec![LyricsLine::new(
        1_000,
        "Hello world",
        vec!["Hello ".to_string(), "world".to_string()],
        vec![400, 500],
    )];
    let src = dir.path().join("song.krc");
    let dst = dir.path().join("song.hrcs");
    io.write_path(&info, &src).unwrap();

    io.convert(&src, &dst).unwrap();
    let converted = io.read_path(&dst).unwrap();
    let line = &converted.lines[0];
    assert_eq!(line.words.len(), line.word_durations.len());
    assert_eq!(line.end_time, 1_900);

    // 450 ms into the line is the 'w' of "world"
    let session = LyricsSession::new(converted.clone(), Some(dst));
    let position = session.word_progress_at(1_450).unwrap();
    let word = position.word_index.unwrap();
    assert_eq!(line.words[word], "w");
}

#[test]
fn test_read_base64_saves_decoded_file() {
    let dir = TempDir::new().unwrap();
    let krc = krc_encrypt("[ti:Downloaded]\n[0,500]<0,500,0>la\n").unwrap();
    let save_to = dir.path().join("lyrics").join("downloaded.krc");

    let info = KrcReader
        .read_base64(&base64_encode(&krc), Some(&save_to))
        .unwrap();
    assert_eq!(info.tags.title.as_deref(), Some("Downloaded"));
    assert_eq!(std::fs::read(&save_to).unwrap(), krc);

    // saved file reads back the same
    assert_eq!(LyricsIo::new().read_path(&save_to).unwrap(), info);
}

#[test]
fn test_unparseable_download_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let save_to = dir.path().join("bad.krc");

    let result = KrcReader.read_base64(&base64_encode(b"not a krc file"), Some(&save_to));
    assert!(result.is_err());
    assert!(!save_to.exists());
}

#[test]
fn test_read_reader() {
    let mut input: &[u8] =
        b"karaoke.songname('s');\nkaraoke.add('00:01.000','00:02.000','[la]','1000');\n";
    let info = KscReader.read_reader(&mut input).unwrap();
    assert_eq!(info.tags.title.as_deref(), Some("s"));
    assert_eq!(info.lines[0].words, vec!["la"]);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let info = LrcReader.read_bytes(b"[ti:caf\xE9]\n[00:01.00]ok\n").unwrap();
    assert_eq!(info.tags.title.as_deref(), Some("caf\u{FFFD}"));
    assert_eq!(info.lines.len(), 1);
}
