//! Health probe for dependent services
//!
//! A probe issues one `GET` per target and classifies the answer; scheduling lives in
//! `beatschain-infra`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Health request failed: {0}")]
    RequestFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Latest observation for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub target: String,
    pub healthy: bool,
    pub status_code: Option<u16>,
    pub latency_ms: u64,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, target: &str) -> HealthStatus;
}

/// Healthy means the target answered with a 2xx status within the timeout.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    http_client: Client,
}

impl HttpHealthProbe {
    pub fn new(timeout: Duration) -> Result<Self, HealthError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HealthError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }

    async fn get(&self, target: &str) -> Result<u16, HealthError> {
        let response = self
            .http_client
            .get(target)
            .header("User-Agent", "BeatsChain-HealthMonitor/1.0")
            .send()
            .await
            .map_err(|e| HealthError::RequestFailed(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, target: &str) -> HealthStatus {
        let start = Instant::now();
        let result = self.get(target).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (healthy, status_code, error) = match result {
            Ok(code) if (200..300).contains(&code) => (true, Some(code), None),
            Ok(code) => (false, Some(code), Some(format!("Unexpected status {}", code))),
            Err(e) => (false, None, Some(e.to_string())),
        };

        HealthStatus {
            target: target.to_string(),
            healthy,
            status_code,
            latency_ms,
            error,
            checked_at: Utc::now(),
        }
    }
}
