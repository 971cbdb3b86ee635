use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MetadataMap, UploadStage};

/// Payload returned to the caller once a job is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadReport {
    Completed(CompletedUpload),
    Failed(FailedUpload),
}

impl UploadReport {
    pub fn job_id(&self) -> Uuid {
        match self {
            UploadReport::Completed(c) => c.job_id,
            UploadReport::Failed(f) => f.job_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadReport::Completed(_))
    }

    pub fn token_id(&self) -> Option<&str> {
        match self {
            UploadReport::Completed(c) => Some(&c.token_id),
            UploadReport::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedUpload {
    pub job_id: Uuid,
    pub token_id: String,
    pub transaction_hash: String,
    pub network: String,
    pub content_id: String,
    pub storage_url: String,
    pub storage_is_placeholder: bool,
    pub playback_id: String,
    pub playback_url: String,
    pub playback_is_placeholder: bool,
    pub attribution_id: Option<String>,
    pub metadata: MetadataMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUpload {
    pub job_id: Uuid,
    /// Stage at which the job failed
    pub stage: UploadStage,
    pub message: String,
}

/// Progress notification emitted on every stage change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub job_id: Uuid,
    pub stage: UploadStage,
    pub percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}
