use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use beatschain_core::{MintConfig, MintedToken, SecretString};

use super::{MintClient, MintError, MintRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintResponse {
    token_id: Option<Value>,
    transaction_hash: Option<Value>,
    network: Option<String>,
}

/// Backends report ids as strings or numbers.
fn id_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Client for an HTTP minting backend exposing `POST /mint`.
pub struct HttpMintClient {
    http_client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
    network: String,
}

impl Debug for HttpMintClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpMintClient")
            .field("endpoint", &self.endpoint)
            .field("network", &self.network)
            .finish()
    }
}

impl HttpMintClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        network: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MintError> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            MintError::ConfigError(format!("Failed to create HTTP client for minting: {}", e))
        })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            network: network.into(),
        })
    }

    pub fn from_config(config: &MintConfig) -> Result<Self, MintError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.network.clone(),
            config.timeout(),
        )
    }
}

#[async_trait]
impl MintClient for HttpMintClient {
    #[tracing::instrument(skip(self, request), fields(recipient = %request.recipient, content_id = %request.content_id))]
    async fn mint(&self, request: &MintRequest) -> Result<MintedToken, MintError> {
        let url = format!("{}/mint", self.endpoint);

        let mut builder = self
            .http_client
            .post(&url)
            .header("content-type", "application/json")
            .json(request);

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MintError::RequestFailed(format!("Failed to reach minting backend: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MintError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let minted: MintResponse = response
            .json()
            .await
            .map_err(|e| MintError::InvalidResponse(format!("Failed to parse mint response: {}", e)))?;

        let token_id = id_text(minted.token_id)
            .ok_or_else(|| MintError::InvalidResponse("Mint response carried no tokenId".to_string()))?;

        let token = MintedToken {
            token_id,
            transaction_hash: id_text(minted.transaction_hash).unwrap_or_default(),
            network: minted.network.unwrap_or_else(|| self.network.clone()),
        };

        tracing::info!(
            token_id = %token.token_id,
            transaction_hash = %token.transaction_hash,
            network = %token.network,
            "Token minted"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::TokenMetadata;
    use beatschain_core::{MetadataMap, StorageResult};
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::Server) -> HttpMintClient {
        HttpMintClient::new(
            server.url(),
            Some(SecretString::new("mint-key")),
            "solana-devnet",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> MintRequest {
        let storage = StorageResult {
            content_id: "QmHash".to_string(),
            url: "https://gateway.pinata.cloud/ipfs/QmHash".to_string(),
            provider: None,
            is_placeholder: false,
        };
        MintRequest {
            recipient: "wallet-1".to_string(),
            metadata: TokenMetadata::for_upload(&MetadataMap::new(), "audio/mpeg", &storage, None),
            content_id: "QmHash".to_string(),
            playback_id: Some("pb".to_string()),
        }
    }

    #[tokio::test]
    async fn test_mint_success_defaults_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/mint")
            .match_header("authorization", "Bearer mint-key")
            .match_body(Matcher::PartialJson(json!({
                "recipient": "wallet-1",
                "contentId": "QmHash",
                "playbackId": "pb",
            })))
            .with_status(200)
            .with_body(r#"{"tokenId":"token-42","transactionHash":"0xabc"}"#)
            .create_async()
            .await;

        let token = client(&server).mint(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token.token_id, "token-42");
        assert_eq!(token.transaction_hash, "0xabc");
        assert_eq!(token.network, "solana-devnet");
    }

    #[tokio::test]
    async fn test_mint_reports_network() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/mint")
            .with_status(200)
            .with_body(r#"{"tokenId":"t","transactionHash":"0x1","network":"solana-mainnet"}"#)
            .create_async()
            .await;

        let token = client(&server).mint(&request()).await.unwrap();
        assert_eq!(token.network, "solana-mainnet");
    }

    #[tokio::test]
    async fn test_mint_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/mint")
            .with_status(500)
            .with_body("chain unavailable")
            .create_async()
            .await;

        let err = client(&server).mint(&request()).await.unwrap_err();
        assert!(matches!(err, MintError::ProviderStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_mint_without_token_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/mint")
            .with_status(200)
            .with_body(r#"{"transactionHash":"0x1"}"#)
            .create_async()
            .await;

        let err = client(&server).mint(&request()).await.unwrap_err();
        assert!(matches!(err, MintError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_mint_numeric_token_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/mint")
            .with_status(200)
            .with_body(r#"{"tokenId":42,"transactionHash":"0x1"}"#)
            .create_async()
            .await;

        let token = client(&server).mint(&request()).await.unwrap();
        assert_eq!(token.token_id, "42");
        assert_eq!(token.transaction_hash, "0x1");
    }

    #[tokio::test]
    async fn test_mint_blank_token_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/mint")
            .with_status(200)
            .with_body(r#"{"tokenId":"  ","transactionHash":"0x1"}"#)
            .create_async()
            .await;

        let err = client(&server).mint(&request()).await.unwrap_err();
        assert!(matches!(err, MintError::InvalidResponse(_)));
    }
}
