use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Accumulated track metadata: string keys to scalar values.
pub type MetadataMap = serde_json::Map<String, Value>;

/// Best-effort output of audio inspection. Fields the inspection could not
/// determine are `None` and are omitted from the metadata map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    /// Audio bitrate in kbps
    pub bitrate: Option<u32>,
    /// Sample rate in Hz
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
    /// Estimated tempo in beats per minute
    pub bpm: Option<u32>,
    pub isrc: Option<String>,
}

impl ExtractedMetadata {
    pub fn to_metadata_map(&self) -> MetadataMap {
        let mut map = MetadataMap::new();

        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put("title", self.title.as_ref().map(|v| json!(v)));
        put("artist", self.artist.as_ref().map(|v| json!(v)));
        put("genre", self.genre.as_ref().map(|v| json!(v)));
        // NaN and infinite durations have no JSON representation
        put(
            "duration",
            self.duration
                .filter(|d| d.is_finite())
                .map(|d| json!((d * 1000.0).round() / 1000.0)),
        );
        put("bitrate", self.bitrate.map(|v| json!(v)));
        put("sample_rate", self.sample_rate.map(|v| json!(v)));
        put("channels", self.channels.map(|v| json!(v)));
        put("bpm", self.bpm.map(|v| json!(v)));
        put("isrc", self.isrc.as_ref().map(|v| json!(v)));

        map
    }
}

/// Read a metadata value as display text, whatever its scalar type.
pub fn metadata_text(metadata: &MetadataMap, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
