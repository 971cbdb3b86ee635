//! Helpers shared by the BeatsChain command-line tools.

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;

use beatschain_core::MetadataMap;

/// Content type for an audio file, guessed from its extension.
///
/// Unknown extensions map to `application/octet-stream` and are rejected later by
/// upload validation.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}

/// Parse a `key=value` metadata override.
///
/// Integer and decimal values become JSON numbers, everything else a string.
pub fn parse_override(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("metadata override '{}' must look like key=value", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("metadata override '{}' has an empty key", raw);
    }

    let value = value.trim();
    let value = if let Ok(n) = value.parse::<i64>() {
        Value::from(n)
    } else if let Some(n) = value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        Value::Number(n)
    } else {
        Value::String(value.to_string())
    };

    Ok((key.to_string(), value))
}

/// Collect repeated `--meta key=value` flags; later flags win.
pub fn parse_overrides<S: AsRef<str>>(raw: &[S]) -> Result<MetadataMap> {
    let mut overrides = MetadataMap::new();
    for item in raw {
        let (key, value) = parse_override(item.as_ref())?;
        overrides.insert(key, value);
    }
    Ok(overrides)
}
