//! BeatsChain Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by every BeatsChain component: the storage providers, the external service
//! clients, and the upload orchestrator.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod placeholder;
pub mod provider_types;
pub mod validation;

// Re-export commonly used types
pub use config::{
    AttributionConfig, Config, HealthCheckConfig, MintConfig, SecretString, StorageConfig,
    TranscodeConfig, ValidationConfig,
};
pub use error::{LogLevel, MetadataError, UploadError, ValidationError};
pub use models::{
    CompletedUpload, ExtractedMetadata, FailedUpload, FileDescriptor, JobOutcome, MetadataMap,
    MintedToken, ProgressEvent, StorageResult, StreamAsset, UploadJob, UploadReport, UploadStage,
};
pub use provider_types::StorageProvider;
