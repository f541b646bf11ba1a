//! Lyrics file discovery
//!
//! Recursive scan of a lyrics folder for supported files, and lookup of the
//! lyrics belonging to a song by its display name.

use crate::error::Result;
use crate::model::LyricsFormat;
use crate::registry::LyricsIo;
use sparkle_common::file_size::{file_ext, remove_ext};
use sparkle_common::Error as CommonError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks lyrics folders
pub struct LyricsScanner {
    io: &'static LyricsIo,
    ignore_patterns: Vec<String>,
}

impl Default for LyricsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsScanner {
    pub fn new() -> Self {
        Self {
            io: LyricsIo::global(),
            ignore_patterns: vec![".git".to_string(), ".svn".to_string(), ".DS_Store".to_string()],
        }
    }

    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        !self.ignore_patterns.iter().any(|p| name == p.as_str())
    }

    /// Every supported lyrics file under `dir`, sorted by path
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(CommonError::NotFound(format!("Lyrics folder {}", dir.display())).into());
        }

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && self.io.is_supported(&entry.file_name().to_string_lossy())
                    {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => tracing::warn!("Error accessing entry: {}", e),
            }
        }
        files.sort();

        tracing::debug!(dir = %dir.display(), count = files.len(), "Scanned lyrics folder");
        Ok(files)
    }

    /// Lyrics file for a song: stem equal to `display_name` (case-insensitive),
    /// the first format in `preferred` winning. An empty `preferred` uses the
    /// registry's order.
    pub fn find_for(
        &self,
        display_name: &str,
        dir: &Path,
        preferred: &[LyricsFormat],
    ) -> Result<Option<PathBuf>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let wanted = display_name.to_lowercase();
        let candidates: Vec<PathBuf> = self
            .scan(dir)?
            .into_iter()
            .filter(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                remove_ext(&name).to_lowercase() == wanted
            })
            .collect();

        let order: Vec<LyricsFormat> = if preferred.is_empty() {
            self.io.formats()
        } else {
            preferred.to_vec()
        };

        for format in order {
            if let Some(found) = candidates.iter().find(|path| format_of(path) == Some(format)) {
                tracing::debug!(name = display_name, file = %found.display(), "Found lyrics");
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }
}

fn format_of(path: &Path) -> Option<LyricsFormat> {
    let name = path.file_name()?.to_string_lossy();
    LyricsFormat::from_ext(&file_ext(&name))
}
