// Pinata IPFS pinning provider

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use beatschain_core::{SecretString, StorageConfig};

use crate::traits::{PinMetadata, StorageClient, StorageError, StorageOpResult, StoredObject};
use crate::StorageProvider;

/// Pinata credentials: a JWT, or the legacy key/secret header pair.
#[derive(Clone)]
pub enum PinataAuth {
    Jwt(SecretString),
    ApiKey {
        api_key: SecretString,
        secret_key: SecretString,
    },
    /// No credentials; requests will be rejected by the real API
    Anonymous,
}

impl PinataAuth {
    pub fn from_config(config: &StorageConfig) -> Self {
        if let Some(jwt) = &config.pinata_jwt {
            return PinataAuth::Jwt(jwt.clone());
        }
        match (&config.pinata_api_key, &config.pinata_secret_key) {
            (Some(api_key), Some(secret_key)) => PinataAuth::ApiKey {
                api_key: api_key.clone(),
                secret_key: secret_key.clone(),
            },
            _ => PinataAuth::Anonymous,
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            PinataAuth::Jwt(jwt) => request.bearer_auth(jwt.expose()),
            PinataAuth::ApiKey {
                api_key,
                secret_key,
            } => request
                .header("pinata_api_key", api_key.expose())
                .header("pinata_secret_api_key", secret_key.expose()),
            PinataAuth::Anonymous => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinFileResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pinata pinning client
pub struct PinataStorage {
    http_client: Client,
    endpoint: String,
    gateway_url: String,
    auth: PinataAuth,
}

impl Debug for PinataStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PinataStorage")
            .field("endpoint", &self.endpoint)
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

impl PinataStorage {
    pub fn new(
        endpoint: impl Into<String>,
        gateway_url: impl Into<String>,
        auth: PinataAuth,
        timeout: Duration,
    ) -> StorageOpResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client for Pinata: {}", e))
            })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn from_config(config: &StorageConfig) -> StorageOpResult<Self> {
        Self::new(
            config.endpoint.clone(),
            config.gateway_url.clone(),
            PinataAuth::from_config(config),
            config.timeout(),
        )
    }
}

#[async_trait]
impl StorageClient for PinataStorage {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
        metadata: &PinMetadata,
    ) -> StorageOpResult<StoredObject> {
        let url = format!("{}/pinning/pinFileToIPFS", self.endpoint);
        let size = data.len();
        let start = std::time::Instant::now();

        let file_part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| StorageError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| StorageError::UploadFailed(format!("Failed to encode metadata: {}", e)))?;

        let form = Form::new()
            .part("file", file_part)
            .text("pinataMetadata", metadata_json);

        let response = self
            .auth
            .apply(self.http_client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to reach Pinata: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StorageError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let pin: PinFileResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(format!("Failed to parse pin response: {}", e)))?;

        if pin.ipfs_hash.trim().is_empty() {
            return Err(StorageError::InvalidResponse(
                "Pin response carried an empty IpfsHash".to_string(),
            ));
        }

        tracing::info!(
            cid = %pin.ipfs_hash,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Pinata upload successful"
        );

        Ok(StoredObject {
            url: self.retrieval_url(&pin.ipfs_hash),
            content_id: pin.ipfs_hash,
        })
    }

    fn retrieval_url(&self, content_id: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url, content_id)
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::Pinata
    }
}
