//! Streaming/transcoding capability
//!
//! A transcode request registers the stored audio with the streaming provider and
//! returns the playback handle immediately. Completion of the transcode is not awaited.

mod livepeer;

pub use livepeer::LivepeerClient;

use async_trait::async_trait;
use beatschain_core::StreamAsset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Transcode request failed: {0}")]
    RequestFailed(String),

    #[error("Transcode provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Invalid transcode response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[async_trait]
pub trait TranscodeClient: Send + Sync {
    /// Ask the provider to import `source_url` under `name`.
    async fn request_transcode(
        &self,
        source_url: &str,
        name: &str,
    ) -> Result<StreamAsset, TranscodeError>;

    /// Playback URL for a playback id issued by this provider.
    fn playback_url(&self, playback_id: &str) -> String;
}
