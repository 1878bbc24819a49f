//! Stream resolution types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested playback quality
///
/// Each provider maps this to its own bitrate label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamQuality {
    Low,
    #[default]
    Standard,
    High,
}

impl StreamQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamQuality::Low => "low",
            StreamQuality::Standard => "standard",
            StreamQuality::High => "high",
        }
    }
}

impl fmt::Display for StreamQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(StreamQuality::Low),
            "standard" => Ok(StreamQuality::Standard),
            "high" => Ok(StreamQuality::High),
            other => Err(format!("Unknown stream quality: {}", other)),
        }
    }
}

/// A resolved stream URL
///
/// An empty `url` with `is_preview = true` is a valid answer: the song exists
/// but the backend has no audio for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub url: String,

    /// Backend bitrate label, e.g. "320kbps"
    pub quality: String,

    pub expires_at: DateTime<Utc>,

    pub is_preview: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StreamInfo {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
