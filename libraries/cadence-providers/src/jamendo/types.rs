//! Jamendo v3.0 response shapes.

use serde::{Deserialize, Deserializer};

/// Every Jamendo response wraps its results in this envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub headers: Headers,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Headers {
    pub status: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_message: String,
}

impl Headers {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub vartags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MusicInfo {
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Default, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "u32_or_string")]
    pub duration: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub artist_id: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub album_id: String,
    #[serde(default)]
    pub album_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub album_image: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub audiodownload: String,
    #[serde(default)]
    pub shareurl: Option<String>,
    #[serde(default)]
    pub license_ccurl: Option<String>,
    #[serde(default)]
    pub musicinfo: Option<MusicInfo>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub musicinfo: Option<MusicInfo>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub releasedate: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub artist_id: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Jamendo is inconsistent about quoting ids
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

fn u32_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().parse().unwrap_or(0),
        StringOrNumber::Int(n) => u32::try_from(n).unwrap_or(0),
        StringOrNumber::Float(n) => n.max(0.0) as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_strings_and_numbers() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "id": 1204669,
            "name": "Wind",
            "duration": "215",
            "artist_id": "7903"
        }))
        .unwrap();
        assert_eq!(track.id, "1204669");
        assert_eq!(track.duration, 215);
        assert_eq!(track.artist_id, "7903");
        assert_eq!(track.album_id, "");
    }

    #[test]
    fn envelope_reports_failure() {
        let env: Envelope<Track> = serde_json::from_value(serde_json::json!({
            "headers": { "status": "failed", "code": 5, "error_message": "Invalid client id" }
        }))
        .unwrap();
        assert!(!env.headers.is_success());
        assert!(env.results.is_empty());
    }
}
