use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use beatschain_core::{ProgressEvent, UploadStage};

/// Publishes progress for one job. A full or closed channel is ignored.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    job_id: Uuid,
    sender: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn new(job_id: Uuid, sender: Option<mpsc::Sender<ProgressEvent>>) -> Self {
        Self { job_id, sender }
    }

    pub fn emit(&self, stage: UploadStage, percent: u8, message: Option<String>) {
        let Some(sender) = &self.sender else {
            return;
        };

        let event = ProgressEvent {
            job_id: self.job_id,
            stage,
            percent,
            message,
            timestamp: Utc::now(),
        };

        if let Err(e) = sender.try_send(event) {
            tracing::debug!(job_id = %self.job_id, stage = %stage, error = %e, "Progress event dropped");
        }
    }
}
