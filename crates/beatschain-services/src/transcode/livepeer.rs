// Livepeer asset import client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use beatschain_core::placeholder::FALLBACK_ID_PREFIX;
use beatschain_core::{SecretString, StreamAsset, TranscodeConfig};

use super::{TranscodeClient, TranscodeError};

#[derive(Debug, Default, Deserialize)]
struct ImportedAsset {
    id: Option<String>,
    #[serde(rename = "playbackId")]
    playback_id: Option<String>,
}

/// `/asset/import` answers either with the asset nested under `asset` or at the top level.
#[derive(Debug, Deserialize)]
struct ImportResponse {
    asset: Option<ImportedAsset>,
    #[serde(flatten)]
    top_level: ImportedAsset,
}

impl ImportResponse {
    fn into_asset(self) -> ImportedAsset {
        match self.asset {
            Some(asset) if asset.id.is_some() || asset.playback_id.is_some() => asset,
            _ => self.top_level,
        }
    }
}

pub struct LivepeerClient {
    http_client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
    playback_base_url: String,
}

impl Debug for LivepeerClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LivepeerClient")
            .field("endpoint", &self.endpoint)
            .field("playback_base_url", &self.playback_base_url)
            .finish()
    }
}

impl LivepeerClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        playback_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranscodeError> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            TranscodeError::ConfigError(format!("Failed to create HTTP client for Livepeer: {}", e))
        })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            playback_base_url: playback_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &TranscodeConfig) -> Result<Self, TranscodeError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.playback_base_url.clone(),
            config.timeout(),
        )
    }
}

#[async_trait]
impl TranscodeClient for LivepeerClient {
    #[tracing::instrument(skip(self), fields(provider = "livepeer"))]
    async fn request_transcode(
        &self,
        source_url: &str,
        name: &str,
    ) -> Result<StreamAsset, TranscodeError> {
        let url = format!("{}/asset/import", self.endpoint);

        let mut request = self
            .http_client
            .post(&url)
            .header("content-type", "application/json")
            .json(&json!({
                "url": source_url,
                "name": name,
            }));

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscodeError::RequestFailed(format!("Failed to reach Livepeer: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscodeError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let asset = response
            .json::<ImportResponse>()
            .await
            .map_err(|e| TranscodeError::InvalidResponse(format!("Failed to parse import response: {}", e)))?
            .into_asset();

        let (playback_id, is_placeholder) = match (asset.playback_id, &asset.id) {
            (Some(playback_id), _) => (playback_id, false),
            (None, Some(asset_id)) => {
                tracing::warn!(asset_id = %asset_id, "Import response carried no playback id");
                (format!("{}playback-{}", FALLBACK_ID_PREFIX, asset_id), true)
            }
            (None, None) => {
                return Err(TranscodeError::InvalidResponse(
                    "Import response carried neither asset id nor playback id".to_string(),
                ))
            }
        };

        tracing::info!(
            asset_id = ?asset.id,
            playback_id = %playback_id,
            "Livepeer import requested"
        );

        Ok(StreamAsset {
            asset_id: asset.id,
            playback_url: self.playback_url(&playback_id),
            playback_id,
            is_placeholder,
        })
    }

    fn playback_url(&self, playback_id: &str) -> String {
        format!("{}/{}", self.playback_base_url, playback_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> LivepeerClient {
        LivepeerClient::new(
            server.url(),
            Some(SecretString::new("lp-key")),
            "https://lvpr.tv/",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_nested_asset_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/asset/import")
            .match_header("authorization", "Bearer lp-key")
            .match_body(Matcher::Json(json!({
                "url": "https://gateway.pinata.cloud/ipfs/QmHash",
                "name": "Night Drive",
            })))
            .with_status(200)
            .with_body(r#"{"asset":{"id":"asset-1","playbackId":"pb-1"},"task":{"id":"task-1"}}"#)
            .create_async()
            .await;

        let asset = client(&server)
            .request_transcode("https://gateway.pinata.cloud/ipfs/QmHash", "Night Drive")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(asset.asset_id.as_deref(), Some("asset-1"));
        assert_eq!(asset.playback_id, "pb-1");
        assert_eq!(asset.playback_url, "https://lvpr.tv/pb-1");
        assert!(!asset.is_placeholder);
    }

    #[tokio::test]
    async fn test_flat_asset_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/asset/import")
            .with_status(201)
            .with_body(r#"{"id":"asset-2","playbackId":"pb-2"}"#)
            .create_async()
            .await;

        let asset = client(&server)
            .request_transcode("https://example.com/a.mp3", "a")
            .await
            .unwrap();
        assert_eq!(asset.asset_id.as_deref(), Some("asset-2"));
        assert_eq!(asset.playback_id, "pb-2");
    }

    #[tokio::test]
    async fn test_missing_playback_id_uses_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/asset/import")
            .with_status(200)
            .with_body(r#"{"asset":{"id":"asset-3"}}"#)
            .create_async()
            .await;

        let asset = client(&server)
            .request_transcode("https://example.com/a.mp3", "a")
            .await
            .unwrap();
        assert_eq!(asset.playback_id, "local-playback-asset-3");
        assert!(asset.is_placeholder);
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/asset/import")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = client(&server)
            .request_transcode("https://example.com/a.mp3", "a")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::ProviderStatus { status: 401, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_response_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/asset/import")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let err = client(&server)
            .request_transcode("https://example.com/a.mp3", "a")
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidResponse(_)));
    }
}
