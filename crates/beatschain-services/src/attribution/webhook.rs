use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use beatschain_core::constants::{EVENT_UPLOAD_COMPLETE, EVENT_UPLOAD_FAILED, SIGNATURE_HEADER};
use beatschain_core::{AttributionConfig, SecretString};

use super::signing::signature_header_value;
use super::{AttributionClient, AttributionError, AttributionEvent, FailureEvent, RevenueEvent};

/// Campaign webhook plus revenue/analytics API client.
///
/// Either URL may be unset, in which case the corresponding calls are skipped.
pub struct WebhookAttributionClient {
    http_client: Client,
    webhook_url: Option<String>,
    endpoint: Option<String>,
    signing_secret: Option<SecretString>,
    platform: String,
    revenue_amount: f64,
}

impl Debug for WebhookAttributionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WebhookAttributionClient")
            .field("webhook_url", &self.webhook_url)
            .field("endpoint", &self.endpoint)
            .field("platform", &self.platform)
            .field("signed", &self.signing_secret.is_some())
            .finish()
    }
}

impl WebhookAttributionClient {
    pub fn new(config: &AttributionConfig) -> Result<Self, AttributionError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AttributionError::ConfigError(format!(
                    "Failed to create HTTP client for attribution: {}",
                    e
                ))
            })?;

        Ok(Self {
            http_client,
            webhook_url: config.webhook_url.clone(),
            endpoint: config
                .endpoint
                .as_ref()
                .map(|e| e.trim_end_matches('/').to_string()),
            signing_secret: config.signing_secret.clone(),
            platform: config.platform.clone(),
            revenue_amount: config.upload_revenue_amount,
        })
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, AttributionError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| AttributionError::RequestFailed(format!("Failed to serialize payload: {}", e)))?;

        let mut request = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json")
            .header("User-Agent", "BeatsChain-Uploader/1.0");

        if let Some(secret) = &self.signing_secret {
            request = request.header(SIGNATURE_HEADER, signature_header_value(&body, secret.expose())?);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| AttributionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Failed to read response body"));

        if !status.is_success() {
            return Err(AttributionError::ProviderStatus {
                status: status.as_u16(),
                body: response_body,
            });
        }

        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response_body)
            .map_err(|e| AttributionError::InvalidResponse(format!("Response is not JSON: {}", e)))
    }

    async fn send_notification(
        &self,
        url: &str,
        event: &AttributionEvent,
    ) -> Result<Option<String>, AttributionError> {
        let mut metadata = event.metadata.clone();
        metadata.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));

        let payload = json!({
            "event_type": event.event_type,
            "platform": self.platform,
            "user_id": event.user_id,
            "metadata": metadata,
        });

        let response = self.post_json(url, &payload).await?;
        Ok(match response.get("campaignId") {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })
    }
}

#[async_trait]
impl AttributionClient for WebhookAttributionClient {
    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type, user_id = %event.user_id))]
    async fn notify(&self, event: &AttributionEvent) -> Option<String> {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                tracing::debug!("Campaign webhook not configured, skipping notification");
                return None;
            }
        };

        match self.send_notification(url, event).await {
            Ok(Some(campaign_id)) => {
                tracing::info!(campaign_id = %campaign_id, "Campaign notification accepted");
                Some(campaign_id)
            }
            Ok(None) => {
                tracing::debug!("Campaign webhook returned no campaign id");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Campaign notification failed");
                None
            }
        }
    }

    #[tracing::instrument(skip(self, event), fields(campaign_id = %event.campaign_id, token_id = %event.token_id))]
    async fn track_revenue(&self, event: &RevenueEvent) {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("Revenue endpoint not configured, skipping revenue tracking");
            return;
        };

        let payload = json!({
            "type": EVENT_UPLOAD_COMPLETE,
            "amount": self.revenue_amount,
            "metadata": {
                "campaignId": event.campaign_id,
                "tokenId": event.token_id,
                "platform": self.platform,
            },
        });

        let url = format!("{}/api/campaigns/track-revenue", endpoint);
        match self.post_json(&url, &payload).await {
            Ok(_) => tracing::info!(amount = self.revenue_amount, "Upload revenue tracked"),
            Err(e) => tracing::warn!(error = %e, "Revenue tracking failed"),
        }
    }

    #[tracing::instrument(skip(self, event), fields(campaign_id = %event.campaign_id))]
    async fn track_failure(&self, event: &FailureEvent) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let payload = json!({
            "type": EVENT_UPLOAD_FAILED,
            "campaignId": event.campaign_id,
            "error": event.error,
        });

        let url = format!("{}/api/analytics/track", endpoint);
        if let Err(e) = self.post_json(&url, &payload).await {
            tracing::warn!(error = %e, "Failure tracking failed");
        }
    }
}
