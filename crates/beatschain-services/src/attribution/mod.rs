//! Campaign attribution
//!
//! Attribution is best effort end to end: the trait methods never return errors.
//! Implementations log failures and report a missing campaign id instead.

pub mod signing;
mod webhook;

pub use webhook::WebhookAttributionClient;

use async_trait::async_trait;
use beatschain_core::MetadataMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("Attribution request failed: {0}")]
    RequestFailed(String),

    #[error("Attribution endpoint returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Invalid attribution response: {0}")]
    InvalidResponse(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Campaign event sent to the webhook before storage.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionEvent {
    pub event_type: String,
    pub user_id: String,
    pub metadata: MetadataMap,
}

/// Revenue credited to a campaign after a successful mint.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueEvent {
    pub campaign_id: String,
    pub token_id: String,
}

/// Analytics event for a job that failed after a campaign id was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureEvent {
    pub campaign_id: String,
    pub error: String,
}

#[async_trait]
pub trait AttributionClient: Send + Sync {
    /// Notify the campaign webhook; returns the campaign id when one was issued.
    async fn notify(&self, event: &AttributionEvent) -> Option<String>;

    async fn track_revenue(&self, event: &RevenueEvent);

    async fn track_failure(&self, event: &FailureEvent);
}
