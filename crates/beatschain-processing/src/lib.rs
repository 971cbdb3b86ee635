//! BeatsChain Processing Library
//!
//! The upload pipeline: validate → extract → merge → notify → store → transcode →
//! mint → attribute. Validation and minting failures end a job; every other
//! external failure is absorbed into a placeholder so the job can still mint.

pub mod metadata;
pub mod upload;

pub use metadata::{merge_metadata, MetadataExtractor};
#[cfg(feature = "audio-tags")]
pub use metadata::AudioTagExtractor;
pub use upload::{ProgressReporter, UploadClients, UploadOrchestrator, UploadRequest};
