use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::report::{CompletedUpload, FailedUpload, UploadReport};
use super::{MetadataMap, MintedToken, StorageResult, StreamAsset, UploadStage};
use crate::error::UploadError;

/// Descriptor of the submitted file, as declared by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content_type: content_type.into(),
        }
    }

    /// File name without its extension, used as a fallback title.
    pub fn stem(&self) -> &str {
        let base = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.name);
        match base.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => base,
        }
    }
}

/// Terminal outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Success { token_id: String },
    Failure { stage: UploadStage, message: String },
}

/// One in-flight asset submission.
///
/// Owned by the orchestration call that created it. Stage changes go through
/// [`UploadJob::advance_to`] and [`UploadJob::fail`], which enforce the forward-only
/// ordering; every mutator refuses to touch a terminal job.
#[derive(Debug, Clone, Serialize)]
pub struct UploadJob {
    id: Uuid,
    owner: String,
    file: FileDescriptor,
    stage: UploadStage,
    progress: u8,
    metadata: MetadataMap,
    attribution_id: Option<String>,
    storage: Option<StorageResult>,
    stream: Option<StreamAsset>,
    token: Option<MintedToken>,
    outcome: Option<JobOutcome>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UploadJob {
    pub fn new(owner: impl Into<String>, file: FileDescriptor) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            file,
            stage: UploadStage::Idle,
            progress: 0,
            metadata: MetadataMap::new(),
            attribution_id: None,
            storage: None,
            stream: None,
            token: None,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn file(&self) -> &FileDescriptor {
        &self.file
    }

    pub fn stage(&self) -> UploadStage {
        self.stage
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn attribution_id(&self) -> Option<&str> {
        self.attribution_id.as_deref()
    }

    pub fn storage(&self) -> Option<&StorageResult> {
        self.storage.as_ref()
    }

    pub fn stream(&self) -> Option<&StreamAsset> {
        self.stream.as_ref()
    }

    pub fn token(&self) -> Option<&MintedToken> {
        self.token.as_ref()
    }

    pub fn outcome(&self) -> Option<&JobOutcome> {
        self.outcome.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Move to `stage`, which must be the immediate successor of the current stage.
    ///
    /// Entering `Completed` requires a minted token and records the success outcome.
    pub fn advance_to(&mut self, stage: UploadStage) -> Result<(), UploadError> {
        self.ensure_mutable()?;

        if self.stage.next() != Some(stage) {
            return Err(UploadError::InvalidTransition {
                from: self.stage,
                to: stage,
            });
        }

        if stage == UploadStage::Completed {
            let token_id = self
                .token
                .as_ref()
                .map(|t| t.token_id.clone())
                .ok_or(UploadError::InvalidTransition {
                    from: self.stage,
                    to: stage,
                })?;
            self.outcome = Some(JobOutcome::Success { token_id });
        }

        self.stage = stage;
        if let Some(percent) = stage.progress_percent() {
            self.progress = percent;
        }
        self.touch();
        Ok(())
    }

    /// Terminate the job at its current stage.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.outcome = Some(JobOutcome::Failure {
            stage: self.stage,
            message: message.into(),
        });
        self.stage = UploadStage::Error;
        self.touch();
        Ok(())
    }

    /// Replace the accumulated metadata (the result of the merge stage).
    pub fn set_metadata(&mut self, metadata: MetadataMap) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.metadata = metadata;
        self.touch();
        Ok(())
    }

    pub fn set_attribution_id(&mut self, attribution_id: Option<String>) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.attribution_id = attribution_id;
        self.touch();
        Ok(())
    }

    pub fn record_storage(&mut self, storage: StorageResult) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.storage = Some(storage);
        self.touch();
        Ok(())
    }

    pub fn record_stream(&mut self, stream: StreamAsset) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.stream = Some(stream);
        self.touch();
        Ok(())
    }

    pub fn record_token(&mut self, token: MintedToken) -> Result<(), UploadError> {
        self.ensure_mutable()?;
        self.token = Some(token);
        self.touch();
        Ok(())
    }

    /// User-visible payload; `None` while the job is still running.
    pub fn report(&self) -> Option<UploadReport> {
        match self.outcome.as_ref()? {
            JobOutcome::Success { token_id } => {
                let token = self.token.as_ref()?;
                let storage = self.storage.as_ref()?;
                let stream = self.stream.as_ref()?;
                Some(UploadReport::Completed(CompletedUpload {
                    job_id: self.id,
                    token_id: token_id.clone(),
                    transaction_hash: token.transaction_hash.clone(),
                    network: token.network.clone(),
                    content_id: storage.content_id.clone(),
                    storage_url: storage.url.clone(),
                    storage_is_placeholder: storage.is_placeholder,
                    playback_id: stream.playback_id.clone(),
                    playback_url: stream.playback_url.clone(),
                    playback_is_placeholder: stream.is_placeholder,
                    attribution_id: self.attribution_id.clone(),
                    metadata: self.metadata.clone(),
                }))
            }
            JobOutcome::Failure { stage, message } => Some(UploadReport::Failed(FailedUpload {
                job_id: self.id,
                stage: *stage,
                message: message.clone(),
            })),
        }
    }

    fn ensure_mutable(&self) -> Result<(), UploadError> {
        if self.stage.is_terminal() {
            return Err(UploadError::JobTerminal(self.stage));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
