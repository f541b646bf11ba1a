//! Sparkle lyrics toolkit
//!
//! Readers and writers for the karaoke lyrics formats used by the Sparkle
//! player (LRC, KSC, KRC, HRCX, HRCS), lookup of the lyrics line at a
//! playback position, and song information from local audio files.

pub mod codec;
pub mod error;
pub mod extra;
pub mod formats;
pub mod manager;
pub mod model;
pub mod registry;
pub mod scanner;
pub mod session;
pub mod song;
pub mod words;

pub use error::{LyricsError, Result};
pub use formats::{LyricsReader, LyricsWriter};
pub use manager::LyricsManager;
pub use model::{
    ExtraKind, ExtraLyrics, LyricsFormat, LyricsInfo, LyricsLine, LyricsTags, TranslationLine,
};
pub use registry::LyricsIo;
pub use scanner::LyricsScanner;
pub use session::{LyricsSession, WordProgress};
pub use song::SongInfo;
