//! Song identifier helpers

use uuid::Uuid;

/// Prefix carried by every locally generated song id
pub const SONG_ID_PREFIX: &str = "SI-";

/// Generate a new song id (`SI-` followed by a simple v4 UUID)
pub fn new_song_id() -> String {
    format!("{}{}", SONG_ID_PREFIX, Uuid::new_v4().simple())
}
