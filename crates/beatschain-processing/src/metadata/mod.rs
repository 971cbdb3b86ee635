//! Metadata extraction and merging

#[cfg(feature = "audio-tags")]
mod extractor;
mod merge;

#[cfg(feature = "audio-tags")]
pub use extractor::AudioTagExtractor;
pub use merge::merge_metadata;

use async_trait::async_trait;
use beatschain_core::{ExtractedMetadata, FileDescriptor};

/// Inspects uploaded bytes. Never fails: unreadable input yields placeholder fields.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, file: &FileDescriptor, data: &[u8]) -> ExtractedMetadata;
}
