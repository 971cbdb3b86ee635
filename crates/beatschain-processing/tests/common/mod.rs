//! In-memory clients for orchestrator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use beatschain_core::{
    Config, ExtractedMetadata, FileDescriptor, MintedToken, StorageProvider, StreamAsset,
};
use beatschain_processing::{MetadataExtractor, UploadClients, UploadOrchestrator};
use beatschain_services::{
    AttributionClient, AttributionEvent, FailureEvent, MintClient, MintError, MintRequest,
    RevenueEvent, TranscodeClient, TranscodeError,
};
use beatschain_storage::{PinMetadata, StorageClient, StorageError, StorageOpResult, StoredObject};

pub struct StaticExtractor(pub ExtractedMetadata);

#[async_trait]
impl MetadataExtractor for StaticExtractor {
    async fn extract(&self, _file: &FileDescriptor, _data: &[u8]) -> ExtractedMetadata {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct MockStorage {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_pin: Mutex<Option<PinMetadata>>,
}

#[async_trait]
impl StorageClient for MockStorage {
    async fn upload(
        &self,
        _filename: &str,
        _content_type: &str,
        _data: Vec<u8>,
        metadata: &PinMetadata,
    ) -> StorageOpResult<StoredObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_pin.lock().unwrap() = Some(metadata.clone());
        if self.fail {
            return Err(StorageError::ProviderStatus {
                status: 500,
                body: "pinning unavailable".to_string(),
            });
        }
        Ok(StoredObject {
            content_id: "QmTestHash".to_string(),
            url: self.retrieval_url("QmTestHash"),
        })
    }

    fn retrieval_url(&self, content_id: &str) -> String {
        format!("https://gateway.pinata.cloud/ipfs/{}", content_id)
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::Pinata
    }
}

#[derive(Default)]
pub struct MockTranscoder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl TranscodeClient for MockTranscoder {
    async fn request_transcode(
        &self,
        _source_url: &str,
        _name: &str,
    ) -> Result<StreamAsset, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranscodeError::RequestFailed("connection refused".to_string()));
        }
        Ok(StreamAsset {
            asset_id: Some("asset-1".to_string()),
            playback_id: "pb-1".to_string(),
            playback_url: self.playback_url("pb-1"),
            is_placeholder: false,
        })
    }

    fn playback_url(&self, playback_id: &str) -> String {
        format!("https://lvpr.tv/{}", playback_id)
    }
}

#[derive(Default)]
pub struct MockMinter {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<MintRequest>>,
}

#[async_trait]
impl MintClient for MockMinter {
    async fn mint(&self, request: &MintRequest) -> Result<MintedToken, MintError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.fail {
            return Err(MintError::ProviderStatus {
                status: 500,
                body: "chain unavailable".to_string(),
            });
        }
        Ok(MintedToken {
            token_id: format!("token-{}", call + 1),
            transaction_hash: "0xabc".to_string(),
            network: "solana-devnet".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingAttribution {
    pub campaign_id: Option<String>,
    pub notified: Mutex<Vec<AttributionEvent>>,
    pub revenue: Mutex<Vec<RevenueEvent>>,
    pub failures: Mutex<Vec<FailureEvent>>,
}

impl RecordingAttribution {
    pub fn with_campaign(campaign_id: &str) -> Self {
        Self {
            campaign_id: Some(campaign_id.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AttributionClient for RecordingAttribution {
    async fn notify(&self, event: &AttributionEvent) -> Option<String> {
        self.notified.lock().unwrap().push(event.clone());
        self.campaign_id.clone()
    }

    async fn track_revenue(&self, event: &RevenueEvent) {
        self.revenue.lock().unwrap().push(event.clone());
    }

    async fn track_failure(&self, event: &FailureEvent) {
        self.failures.lock().unwrap().push(event.clone());
    }
}

/// Mocks plus the orchestrator wired to them.
pub struct Harness {
    pub storage: Arc<MockStorage>,
    pub transcoder: Arc<MockTranscoder>,
    pub minter: Arc<MockMinter>,
    pub attribution: Arc<RecordingAttribution>,
    pub orchestrator: UploadOrchestrator,
}

pub struct HarnessBuilder {
    pub config: Config,
    pub extracted: ExtractedMetadata,
    pub storage: MockStorage,
    pub transcoder: MockTranscoder,
    pub minter: MockMinter,
    pub attribution: RecordingAttribution,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            config: Config::new("http://mint.test"),
            extracted: ExtractedMetadata::default(),
            storage: MockStorage::default(),
            transcoder: MockTranscoder::default(),
            minter: MockMinter::default(),
            attribution: RecordingAttribution::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn build(self) -> Harness {
        let storage = Arc::new(self.storage);
        let transcoder = Arc::new(self.transcoder);
        let minter = Arc::new(self.minter);
        let attribution = Arc::new(self.attribution);

        let clients = UploadClients {
            extractor: Arc::new(StaticExtractor(self.extracted)),
            storage: storage.clone(),
            transcoder: transcoder.clone(),
            minter: minter.clone(),
            attribution: attribution.clone(),
        };

        Harness {
            orchestrator: UploadOrchestrator::new(&self.config, clients),
            storage,
            transcoder,
            minter,
            attribution,
        }
    }
}

impl Harness {
    pub fn network_calls(&self) -> usize {
        self.storage.calls.load(Ordering::SeqCst)
            + self.transcoder.calls.load(Ordering::SeqCst)
            + self.minter.calls.load(Ordering::SeqCst)
            + self.attribution.notified.lock().unwrap().len()
    }
}
