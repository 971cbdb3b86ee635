//! Storage abstraction trait
//!
//! This module defines the StorageClient trait that all storage providers must implement.

use crate::StorageProvider;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageOpResult<T> = Result<T, StorageError>;

/// Descriptive metadata attached to pinned content.
///
/// Serialized as Pinata's `pinataMetadata` form part; the local provider writes it
/// next to the stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinMetadata {
    pub name: String,
    pub keyvalues: BTreeMap<String, String>,
}

/// Identifier and locator of a persisted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_id: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// Every content-addressed provider implements this trait; the orchestrator only sees
/// `Arc<dyn StorageClient>` and the factory picks the implementation from configuration.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Persist `data` and return its content identifier and retrieval URL.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
        metadata: &PinMetadata,
    ) -> StorageOpResult<StoredObject>;

    /// Retrieval URL for a content identifier issued by this provider.
    fn retrieval_url(&self, content_id: &str) -> String;

    /// Get the storage provider type
    fn provider(&self) -> StorageProvider;
}
