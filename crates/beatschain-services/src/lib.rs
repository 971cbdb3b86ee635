//! BeatsChain Services Library
//!
//! Clients for the external capabilities the upload pipeline depends on. Each
//! capability is a trait with one HTTP implementation selected by configuration:
//!
//! - **transcode**: Livepeer asset import
//! - **mint**: token minting backend
//! - **attribution**: campaign webhook, revenue and failure tracking
//! - **health**: HTTP health probe used by the scheduled monitor

#[cfg(feature = "attribution")]
pub mod attribution;
#[cfg(feature = "health")]
pub mod health;
#[cfg(feature = "mint")]
pub mod mint;
#[cfg(feature = "transcode")]
pub mod transcode;

// Re-export commonly used types
#[cfg(feature = "attribution")]
pub use attribution::{
    AttributionClient, AttributionError, AttributionEvent, FailureEvent, RevenueEvent,
    WebhookAttributionClient,
};
#[cfg(feature = "health")]
pub use health::{HealthError, HealthProbe, HealthStatus, HttpHealthProbe};
#[cfg(feature = "mint")]
pub use mint::{HttpMintClient, MintClient, MintError, MintRequest, TokenAttribute, TokenMetadata};
#[cfg(feature = "transcode")]
pub use transcode::{LivepeerClient, TranscodeClient, TranscodeError};
