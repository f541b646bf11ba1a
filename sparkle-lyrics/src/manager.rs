//! Lyrics of the song currently playing
//!
//! Only one song plays at a time, so the manager keeps a single session keyed
//! by song id. Asking again for the same song reuses the parsed file.

use crate::error::{LyricsError, Result};
use crate::registry::LyricsIo;
use crate::session::LyricsSession;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Current {
    sid: String,
    session: Option<Arc<LyricsSession>>,
}

/// Shared cache of the current song's lyrics
pub struct LyricsManager {
    io: &'static LyricsIo,
    current: RwLock<Current>,
}

impl Default for LyricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsManager {
    pub fn new() -> Self {
        Self::with_io(LyricsIo::global())
    }

    pub fn with_io(io: &'static LyricsIo) -> Self {
        Self {
            io,
            current: RwLock::new(Current::default()),
        }
    }

    /// Session for `sid`, parsing `path` when the song changed or nothing is cached
    pub async fn load(&self, sid: &str, path: &Path) -> Result<Arc<LyricsSession>> {
        {
            let current = self.current.read().await;
            if current.sid == sid {
                if let Some(session) = &current.session {
                    debug!(sid, "Reusing cached lyrics");
                    return Ok(session.clone());
                }
            }
        }

        let mut current = self.current.write().await;
        // another task may have loaded it while we waited for the write lock
        if current.sid == sid {
            if let Some(session) = &current.session {
                return Ok(session.clone());
            }
        }

        let session = Arc::new(self.parse(path.to_path_buf()).await?);
        info!(
            sid,
            file = %path.display(),
            lines = session.lines().len(),
            "Loaded lyrics"
        );
        current.sid = sid.to_string();
        current.session = Some(session.clone());
        Ok(session)
    }

    async fn parse(&self, path: PathBuf) -> Result<LyricsSession> {
        let io = self.io;
        tokio::task::spawn_blocking(move || -> Result<LyricsSession> {
            let info = io.read_path(&path)?;
            Ok(LyricsSession::new(info, Some(path)))
        })
        .await
        .map_err(|e| {
            LyricsError::Common(sparkle_common::Error::Internal(format!(
                "Lyrics parse task failed: {}",
                e
            )))
        })?
    }

    /// Cached session, only when it belongs to `sid`
    pub async fn current(&self, sid: &str) -> Option<Arc<LyricsSession>> {
        let current = self.current.read().await;
        if current.sid == sid {
            current.session.clone()
        } else {
            None
        }
    }

    /// Song id the cache belongs to
    pub async fn current_sid(&self) -> String {
        self.current.read().await.sid.clone()
    }

    /// Drop the cached session, keeping the song id
    pub async fn clean(&self) {
        let mut current = self.current.write().await;
        if current.session.take().is_some() {
            debug!(sid = %current.sid, "Dropped cached lyrics");
        }
    }
}
