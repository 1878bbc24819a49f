//! Offline download grants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed offline-download grant for one song.
///
/// At most one per user and song; requesting it again replaces the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub song_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub downloaded_at: DateTime<Utc>,
}

impl Download {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
