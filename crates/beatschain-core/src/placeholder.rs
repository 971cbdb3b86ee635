//! Locally generated identifiers substituted when a best-effort provider fails.
//!
//! Every placeholder starts with [`FALLBACK_ID_PREFIX`] so downstream consumers can tell
//! a fabricated identifier from one issued by a provider.

use chrono::Utc;
use uuid::Uuid;

/// Marker that begins every placeholder identifier.
pub const FALLBACK_ID_PREFIX: &str = "local-";

/// Kind of identifier being fabricated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Content identifier for the storage stage
    Content,
    /// Asset identifier for the transcoding stage
    Asset,
    /// Playback identifier for the transcoding stage
    Playback,
}

impl PlaceholderKind {
    fn label(self) -> Option<&'static str> {
        match self {
            PlaceholderKind::Content => None,
            PlaceholderKind::Asset => Some("asset"),
            PlaceholderKind::Playback => Some("playback"),
        }
    }
}

/// Generate `local-[kind-]<unix millis>-<8 hex chars>`.
pub fn placeholder_id(kind: PlaceholderKind) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..8];
    match kind.label() {
        Some(label) => format!("{FALLBACK_ID_PREFIX}{label}-{millis}-{suffix}"),
        None => format!("{FALLBACK_ID_PREFIX}{millis}-{suffix}"),
    }
}

pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(FALLBACK_ID_PREFIX)
}

/// Local blob reference recorded in place of a retrieval URL.
pub fn local_blob_ref(job_id: Uuid, filename: &str) -> String {
    let safe: String = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() || safe.contains("..") {
        "file".to_string()
    } else {
        safe
    };
    format!("blob:local/{job_id}/{safe}")
}
