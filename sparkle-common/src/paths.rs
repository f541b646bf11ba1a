//! On-disk layout of the player's data folder
//!
//! Everything the player persists lives below one root folder
//! (`sparkleplayer` by default). Each concern gets its own subdirectory.

use crate::Result;
use std::path::{Path, PathBuf};

/// Application name shown in titles and logs
pub const APP_NAME: &str = "Sparkle";

/// Default name of the data root directory
pub const ROOT_DIR_NAME: &str = "sparkleplayer";

const SUBDIRS: [&str; 9] = [
    "logcat", "audio", "lyrics", "artist", "album", "skin", "fonts", "icon", "db",
];

/// Resolved data folder layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logcat(&self) -> PathBuf {
        self.root.join("logcat")
    }

    pub fn audio(&self) -> PathBuf {
        self.root.join("audio")
    }

    pub fn lyrics(&self) -> PathBuf {
        self.root.join("lyrics")
    }

    pub fn artist(&self) -> PathBuf {
        self.root.join("artist")
    }

    /// Album covers extracted from audio tags
    pub fn album(&self) -> PathBuf {
        self.root.join("album")
    }

    pub fn skin(&self) -> PathBuf {
        self.root.join("skin")
    }

    pub fn fonts(&self) -> PathBuf {
        self.root.join("fonts")
    }

    pub fn icon(&self) -> PathBuf {
        self.root.join("icon")
    }

    pub fn db(&self) -> PathBuf {
        self.root.join("db")
    }

    /// Create the root and every subdirectory that does not exist yet
    pub fn ensure_all(&self) -> Result<()> {
        for dir in SUBDIRS {
            let path = self.root.join(dir);
            if !path.exists() {
                std::fs::create_dir_all(&path)?;
                tracing::debug!(path = %path.display(), "Created data directory");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdirectories_hang_off_root() {
        let paths = AppPaths::new("/data/sparkleplayer");
        assert_eq!(paths.lyrics(), PathBuf::from("/data/sparkleplayer/lyrics"));
        assert_eq!(paths.album(), PathBuf::from("/data/sparkleplayer/album"));
        assert_eq!(paths.db(), PathBuf::from("/data/sparkleplayer/db"));
    }

    #[test]
    fn test_ensure_all_creates_layout() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = AppPaths::new(temp.path().join(ROOT_DIR_NAME));
        paths.ensure_all().unwrap();

        for dir in SUBDIRS {
            assert!(paths.root().join(dir).is_dir(), "missing {}", dir);
        }

        // Second call is a no-op
        paths.ensure_all().unwrap();
    }
}
