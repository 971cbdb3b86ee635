use serde::{Deserialize, Serialize};

use crate::StorageProvider;

/// Where the uploaded audio was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageResult {
    /// Content identifier returned by the provider (IPFS hash, sha256 digest)
    pub content_id: String,
    /// Resolvable retrieval URL
    pub url: String,
    /// Provider that produced the result; `None` for placeholders
    pub provider: Option<StorageProvider>,
    /// True when the provider failed and a local placeholder was substituted
    pub is_placeholder: bool,
}

/// Playback handle returned by the transcoding provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAsset {
    pub asset_id: Option<String>,
    pub playback_id: String,
    pub playback_url: String,
    pub is_placeholder: bool,
}

/// Result of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedToken {
    pub token_id: String,
    pub transaction_hash: String,
    pub network: String,
}
