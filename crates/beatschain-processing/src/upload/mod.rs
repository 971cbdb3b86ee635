//! Upload orchestration

mod orchestrator;
mod progress;
mod types;

pub use orchestrator::{UploadClients, UploadOrchestrator};
pub use progress::ProgressReporter;
pub use types::UploadRequest;
