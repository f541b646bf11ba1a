//! Song information read from local audio files
//!
//! Names follow the `Artist - Title.ext` convention; tags found in the file
//! take precedence over the name when present.

use crate::error::{LyricsError, Result};
use chrono::Local;
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;
use serde::Serialize;
use sparkle_common::file_size::format_file_size;
use sparkle_common::human_time::format_clock;
use sparkle_common::uuid_utils::new_song_id;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files smaller than this are not treated as songs
pub const MIN_SONG_SIZE: u64 = 1024 * 1024;

const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongInfo {
    /// `SI-` prefixed unique id
    pub sid: String,
    /// File name without extension
    pub display_name: String,
    pub singer: String,
    pub title: String,
    pub album: Option<String>,
    pub duration_ms: i64,
    /// `MM:SS`
    pub duration_str: String,
    pub size: u64,
    pub size_str: String,
    pub file_path: String,
    pub create_time: String,
    /// Saved album cover, when the file carries one
    pub album_url: Option<String>,
}

impl SongInfo {
    /// Read song info from an audio file.
    ///
    /// Returns `Ok(None)` when the file is missing or smaller than [`MIN_SONG_SIZE`].
    pub fn from_file(path: &Path) -> Result<Option<SongInfo>> {
        if !path.is_file() {
            debug!(file = %path.display(), "Song file not found");
            return Ok(None);
        }

        let size = std::fs::metadata(path)?.len();
        if size < MIN_SONG_SIZE {
            debug!(file = %path.display(), size, "Skipping file below minimum song size");
            return Ok(None);
        }

        let tagged_file = Probe::open(path)
            .map_err(|e| LyricsError::Metadata(e.to_string()))?
            .read()
            .map_err(|e| LyricsError::Metadata(e.to_string()))?;

        let duration_ms = tagged_file.properties().duration().as_millis() as i64;

        let display_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (mut singer, mut title) = split_display_name(&display_name);
        let mut album = None;

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            if let Some(value) = non_blank(tag.title()) {
                title = value;
            }
            if let Some(value) = non_blank(tag.artist()) {
                singer = value;
            }
            album = non_blank(tag.album());
        }

        let info = SongInfo {
            sid: new_song_id(),
            display_name,
            singer,
            title,
            album,
            duration_ms,
            duration_str: format_clock(duration_ms),
            size,
            size_str: format_file_size(size),
            file_path: path.to_string_lossy().into_owned(),
            create_time: Local::now().format(CREATE_TIME_FORMAT).to_string(),
            album_url: None,
        };

        debug!(
            file = %path.display(),
            sid = %info.sid,
            singer = %info.singer,
            title = %info.title,
            duration_ms,
            "Read song info"
        );
        Ok(Some(info))
    }

    /// Save the embedded cover as `<sid>.jpg` in `album_dir` and record its path.
    /// A file without a cover is left unchanged; failures are logged, not returned.
    pub fn attach_album_cover(&mut self, album_dir: &Path) {
        let path = Path::new(&self.file_path);
        match extract_album_art(path) {
            Ok(Some(data)) => match save_album_cover(&data, &self.sid, album_dir) {
                Ok(saved) => self.album_url = Some(saved.to_string_lossy().into_owned()),
                Err(e) => warn!(sid = %self.sid, error = %e, "Failed to save album cover"),
            },
            Ok(None) => {}
            Err(e) => warn!(file = %path.display(), error = %e, "Failed to read album cover"),
        }
    }
}

/// `"Artist - Title"` into (artist, title); a name without `-` is all title
pub fn split_display_name(display_name: &str) -> (String, String) {
    let split = display_name
        .split_once(" - ")
        .or_else(|| display_name.split_once('-'));
    match split {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), display_name.to_string()),
    }
}

fn non_blank(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First picture of the file's primary tag
pub fn extract_album_art(path: &Path) -> Result<Option<Vec<u8>>> {
    let tagged_file = Probe::open(path)
        .map_err(|e| LyricsError::Metadata(e.to_string()))?
        .read()
        .map_err(|e| LyricsError::Metadata(e.to_string()))?;

    let picture = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .and_then(|tag| tag.pictures().first())
        .map(|p| p.data().to_vec());
    Ok(picture)
}

/// Write cover bytes to `<album_dir>/<sid>.jpg`
pub fn save_album_cover(data: &[u8], sid: &str, album_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(album_dir)?;
    let target = album_dir.join(format!("{}.jpg", sid));
    std::fs::write(&target, data)?;
    debug!(file = %target.display(), bytes = data.len(), "Saved album cover");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_display_name() {
        assert_eq!(
            split_display_name("周杰伦 - 晴天"),
            ("周杰伦".to_string(), "晴天".to_string())
        );
        assert_eq!(
            split_display_name("Artist-Title"),
            ("Artist".to_string(), "Title".to_string())
        );
        assert_eq!(
            split_display_name("a-ha - Take On Me"),
            ("a-ha".to_string(), "Take On Me".to_string())
        );
        assert_eq!(split_display_name("Untitled"), (String::new(), "Untitled".to_string()));
    }

    #[test]
    fn test_missing_and_small_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        assert!(SongInfo::from_file(&dir.path().join("none.mp3")).unwrap().is_none());

        let small = dir.path().join("small.mp3");
        std::fs::write(&small, vec![0u8; 1024]).unwrap();
        assert!(SongInfo::from_file(&small).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_audio_is_an_error() {
        let dir = TempDir::new().unwrap();
        let junk = dir.path().join("junk.wav");
        std::fs::write(&junk, vec![0u8; MIN_SONG_SIZE as usize]).unwrap();
        assert!(matches!(
            SongInfo::from_file(&junk),
            Err(LyricsError::Metadata(_))
        ));
    }

    #[test]
    fn test_save_album_cover() {
        let dir = TempDir::new().unwrap();
        let album_dir = dir.path().join("album");
        let saved = save_album_cover(b"\xFF\xD8jpeg", "SI-abc", &album_dir).unwrap();
        assert_eq!(saved, album_dir.join("SI-abc.jpg"));
        assert_eq!(std::fs::read(saved).unwrap(), b"\xFF\xD8jpeg");
    }
}
