//! Upload orchestrator: validate → extract → merge → notify → store → transcode →
//! mint → attribute.
//!
//! Each stage is attempted once. Validation and minting failures end the job in the
//! `error` stage; storage and transcoding failures are replaced by placeholders and
//! notification/attribution failures are ignored, so a job that passes validation
//! always reaches minting.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

use beatschain_core::constants::EVENT_UPLOAD_START;
use beatschain_core::models::metadata_text;
use beatschain_core::placeholder::{local_blob_ref, placeholder_id, PlaceholderKind};
use beatschain_core::validation::{validate_file, validate_user_metadata};
use beatschain_core::{
    Config, FailedUpload, LogLevel, MetadataMap, ProgressEvent, StorageResult, StreamAsset,
    UploadError, UploadJob, UploadReport, UploadStage, ValidationConfig,
};
use beatschain_services::{
    AttributionClient, AttributionEvent, FailureEvent, HttpMintClient, LivepeerClient,
    MintClient, MintRequest, RevenueEvent, TokenMetadata, TranscodeClient,
    WebhookAttributionClient,
};
use beatschain_storage::{create_storage, PinMetadata, StorageClient};

use super::progress::ProgressReporter;
use super::types::UploadRequest;
use crate::metadata::{merge_metadata, MetadataExtractor};

/// External capabilities used by the orchestrator.
#[derive(Clone)]
pub struct UploadClients {
    pub extractor: Arc<dyn MetadataExtractor>,
    pub storage: Arc<dyn StorageClient>,
    pub transcoder: Arc<dyn TranscodeClient>,
    pub minter: Arc<dyn MintClient>,
    pub attribution: Arc<dyn AttributionClient>,
}

impl UploadClients {
    /// Build the HTTP-backed clients selected by configuration.
    #[cfg(feature = "audio-tags")]
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = create_storage(&config.storage)
            .await
            .context("Failed to initialize content storage")?;
        let transcoder = LivepeerClient::from_config(&config.transcode)
            .context("Failed to initialize transcoding client")?;
        let minter =
            HttpMintClient::from_config(&config.mint).context("Failed to initialize mint client")?;
        let attribution = WebhookAttributionClient::new(&config.attribution)
            .context("Failed to initialize attribution client")?;

        Ok(Self {
            extractor: Arc::new(crate::metadata::AudioTagExtractor::new()),
            storage,
            transcoder: Arc::new(transcoder),
            minter: Arc::new(minter),
            attribution: Arc::new(attribution),
        })
    }
}

/// Drives upload jobs through the fixed stage sequence.
///
/// Jobs share nothing but the configuration and the client handles, so one
/// orchestrator can run any number of jobs concurrently.
#[derive(Clone)]
pub struct UploadOrchestrator {
    validation: ValidationConfig,
    transcode_enabled: bool,
    clients: UploadClients,
}

impl UploadOrchestrator {
    pub fn new(config: &Config, clients: UploadClients) -> Self {
        Self {
            validation: config.validation.clone(),
            transcode_enabled: config.transcode.enabled,
            clients,
        }
    }

    /// Validate `config` and build the orchestrator with HTTP-backed clients.
    #[cfg(feature = "audio-tags")]
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let clients = UploadClients::from_config(config).await?;
        Ok(Self::new(config, clients))
    }

    /// Run one job to a terminal stage and return its report.
    ///
    /// Progress events are published on `progress` when given; a slow or dropped
    /// receiver never affects the job.
    pub async fn process(
        &self,
        request: UploadRequest,
        progress: Option<mpsc::Sender<ProgressEvent>>,
    ) -> UploadReport {
        let UploadRequest {
            owner,
            file,
            data,
            overrides,
        } = request;

        let mut job = UploadJob::new(owner, file);
        let reporter = ProgressReporter::new(job.id(), progress);

        tracing::info!(
            job_id = %job.id(),
            owner = %job.owner(),
            file = %job.file().name,
            size_bytes = job.file().size_bytes,
            "Upload job started"
        );

        match self.run(&mut job, data, &overrides, &reporter).await {
            Ok(()) => {
                tracing::info!(
                    job_id = %job.id(),
                    token_id = ?job.token().map(|t| t.token_id.as_str()),
                    "Upload job completed"
                );
            }
            Err(e) => self.handle_failure(&mut job, e, &reporter).await,
        }

        job.report().unwrap_or_else(|| {
            UploadReport::Failed(FailedUpload {
                job_id: job.id(),
                stage: job.stage(),
                message: "job ended without an outcome".to_string(),
            })
        })
    }

    async fn run(
        &self,
        job: &mut UploadJob,
        data: Vec<u8>,
        overrides: &MetadataMap,
        reporter: &ProgressReporter,
    ) -> Result<(), UploadError> {
        self.enter(job, UploadStage::Validating, reporter)?;
        validate_file(job.file(), &self.validation)?;
        validate_user_metadata(overrides)?;

        self.enter(job, UploadStage::Extracting, reporter)?;
        let extracted = self.clients.extractor.extract(job.file(), &data).await;

        self.enter(job, UploadStage::Merging, reporter)?;
        job.set_metadata(merge_metadata(extracted.to_metadata_map(), overrides))?;

        self.enter(job, UploadStage::Notifying, reporter)?;
        let campaign_id = self
            .clients
            .attribution
            .notify(&AttributionEvent {
                event_type: EVENT_UPLOAD_START.to_string(),
                user_id: job.owner().to_string(),
                metadata: job.metadata().clone(),
            })
            .await;
        job.set_attribution_id(campaign_id)?;

        self.enter(job, UploadStage::Storing, reporter)?;
        let storage = self.store(job, data).await;
        job.record_storage(storage.clone())?;

        self.enter(job, UploadStage::Transcoding, reporter)?;
        let stream = self.transcode(job, &storage).await;
        job.record_stream(stream.clone())?;

        self.enter(job, UploadStage::Minting, reporter)?;
        let request = MintRequest {
            recipient: job.owner().to_string(),
            metadata: TokenMetadata::for_upload(
                job.metadata(),
                &job.file().content_type,
                &storage,
                Some(&stream),
            ),
            content_id: storage.content_id.clone(),
            playback_id: Some(stream.playback_id.clone()),
        };
        let token = self
            .clients
            .minter
            .mint(&request)
            .await
            .map_err(|e| UploadError::Mint(e.to_string()))?;
        let token_id = token.token_id.clone();
        job.record_token(token)?;

        self.enter(job, UploadStage::Attributing, reporter)?;
        match job.attribution_id() {
            Some(campaign_id) => {
                self.clients
                    .attribution
                    .track_revenue(&RevenueEvent {
                        campaign_id: campaign_id.to_string(),
                        token_id,
                    })
                    .await;
            }
            None => {
                tracing::debug!(job_id = %job.id(), "No campaign id, skipping revenue tracking");
            }
        }

        self.enter(job, UploadStage::Completed, reporter)
    }

    fn enter(
        &self,
        job: &mut UploadJob,
        stage: UploadStage,
        reporter: &ProgressReporter,
    ) -> Result<(), UploadError> {
        job.advance_to(stage)?;
        tracing::debug!(job_id = %job.id(), stage = %stage, progress = job.progress(), "Stage entered");
        reporter.emit(stage, job.progress(), None);
        Ok(())
    }

    /// Persist the audio; on failure record a placeholder so the job can still mint.
    async fn store(&self, job: &UploadJob, data: Vec<u8>) -> StorageResult {
        let file = job.file();
        let pin = pin_metadata(job.metadata(), &file.name);

        match self
            .clients
            .storage
            .upload(&file.name, &file.content_type, data, &pin)
            .await
        {
            Ok(stored) => {
                tracing::info!(job_id = %job.id(), cid = %stored.content_id, "Audio stored");
                StorageResult {
                    content_id: stored.content_id,
                    url: stored.url,
                    provider: Some(self.clients.storage.provider()),
                    is_placeholder: false,
                }
            }
            Err(e) => {
                let content_id = placeholder_id(PlaceholderKind::Content);
                tracing::warn!(
                    job_id = %job.id(),
                    stage = %UploadStage::Storing,
                    error = %e,
                    cid = %content_id,
                    "Storage failed, continuing with placeholder"
                );
                StorageResult {
                    content_id,
                    url: local_blob_ref(job.id(), &file.name),
                    provider: None,
                    is_placeholder: true,
                }
            }
        }
    }

    /// Request a stream for the stored audio. Placeholder storage has no fetchable URL,
    /// so it gets a placeholder stream without a network call.
    async fn transcode(&self, job: &UploadJob, storage: &StorageResult) -> StreamAsset {
        if !self.transcode_enabled {
            tracing::debug!(job_id = %job.id(), "Transcoding disabled, recording placeholder");
            return placeholder_stream(storage);
        }
        if storage.is_placeholder {
            tracing::debug!(job_id = %job.id(), "Stored content is a placeholder, skipping transcode");
            return placeholder_stream(storage);
        }

        let name = metadata_text(job.metadata(), "title")
            .unwrap_or_else(|| job.file().stem().to_string());

        match self
            .clients
            .transcoder
            .request_transcode(&storage.url, &name)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(
                    job_id = %job.id(),
                    stage = %UploadStage::Transcoding,
                    error = %e,
                    "Transcoding failed, continuing with placeholder"
                );
                placeholder_stream(storage)
            }
        }
    }

    async fn handle_failure(
        &self,
        job: &mut UploadJob,
        error: UploadError,
        reporter: &ProgressReporter,
    ) {
        let stage = job.stage();
        let message = error.to_string();

        match error.log_level() {
            LogLevel::Debug => tracing::debug!(
                job_id = %job.id(),
                stage = %stage,
                code = error.error_code(),
                error = %message,
                "Upload rejected"
            ),
            LogLevel::Warn => tracing::warn!(
                job_id = %job.id(),
                stage = %stage,
                code = error.error_code(),
                error = %message,
                "Upload failed"
            ),
            LogLevel::Error => tracing::error!(
                job_id = %job.id(),
                stage = %stage,
                code = error.error_code(),
                error = %message,
                "Upload failed"
            ),
        }

        if let Err(e) = job.fail(message.clone()) {
            tracing::error!(job_id = %job.id(), error = %e, "Failed to record job failure");
            return;
        }
        reporter.emit(UploadStage::Error, job.progress(), Some(message.clone()));

        if let Some(campaign_id) = job.attribution_id() {
            self.clients
                .attribution
                .track_failure(&FailureEvent {
                    campaign_id: campaign_id.to_string(),
                    error: message,
                })
                .await;
        }
    }
}

fn placeholder_stream(storage: &StorageResult) -> StreamAsset {
    StreamAsset {
        asset_id: Some(placeholder_id(PlaceholderKind::Asset)),
        playback_id: placeholder_id(PlaceholderKind::Playback),
        playback_url: storage.url.clone(),
        is_placeholder: true,
    }
}

/// `pinataMetadata` for the stored file: the title (or file name) plus the artist,
/// genre and tempo when known.
fn pin_metadata(metadata: &MetadataMap, filename: &str) -> PinMetadata {
    let mut pin = PinMetadata {
        name: metadata_text(metadata, "title").unwrap_or_else(|| filename.to_string()),
        ..Default::default()
    };
    for key in ["artist", "genre", "bpm"] {
        if let Some(value) = metadata_text(metadata, key) {
            pin.keyvalues.insert(key.to_string(), value);
        }
    }
    pin
}
