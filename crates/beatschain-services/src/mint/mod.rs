//! Token minting capability
//!
//! Minting is the only external call whose failure ends a job. The request carries
//! the token-attribute record built from the merged metadata and the storage and
//! stream results recorded earlier in the pipeline.

mod http;

pub use http::HttpMintClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use beatschain_core::constants::{DEFAULT_TOKEN_NAME, UNKNOWN_ARTIST};
use beatschain_core::models::metadata_text;
use beatschain_core::{MetadataMap, MintedToken, StorageResult, StreamAsset};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum MintError {
    #[error("Mint request failed: {0}")]
    RequestFailed(String),

    #[error("Mint backend returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Invalid mint response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// One `{trait_type, value}` entry of the token attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenProperties {
    pub files: Vec<TokenFile>,
    pub category: String,
}

/// Token-attribute record sent to the minting backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub animation_url: String,
    pub attributes: Vec<TokenAttribute>,
    pub properties: TokenProperties,
}

impl TokenMetadata {
    /// Build the record for an upload.
    ///
    /// `animation_url` prefers the playback URL and falls back to the storage URL when
    /// no stream was recorded.
    pub fn for_upload(
        metadata: &MetadataMap,
        content_type: &str,
        storage: &StorageResult,
        stream: Option<&StreamAsset>,
    ) -> Self {
        let title = metadata_text(metadata, "title");
        let artist = metadata_text(metadata, "artist").unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let name = title.unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string());

        let attribute = |trait_type: &str, key: &str| TokenAttribute {
            trait_type: trait_type.to_string(),
            value: match metadata.get(key) {
                Some(Value::Null) | None => Value::String(NOT_AVAILABLE.to_string()),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    Value::String(NOT_AVAILABLE.to_string())
                }
                Some(value) => value.clone(),
            },
        };

        Self {
            description: format!("{} - {}", artist, name),
            name,
            image: storage.url.clone(),
            animation_url: stream
                .map(|s| s.playback_url.clone())
                .unwrap_or_else(|| storage.url.clone()),
            attributes: vec![
                attribute("Artist", "artist"),
                attribute("Genre", "genre"),
                attribute("BPM", "bpm"),
                attribute("Duration", "duration"),
                attribute("ISRC", "isrc"),
            ],
            properties: TokenProperties {
                files: vec![TokenFile {
                    uri: storage.url.clone(),
                    content_type: content_type.to_string(),
                }],
                category: "audio".to_string(),
            },
        }
    }
}

/// Request body for the minting backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    /// Wallet address (or the anonymous marker) receiving the token
    pub recipient: String,
    pub metadata: TokenMetadata,
    pub content_id: String,
    pub playback_id: Option<String>,
}

#[async_trait]
pub trait MintClient: Send + Sync {
    async fn mint(&self, request: &MintRequest) -> Result<MintedToken, MintError>;
}
