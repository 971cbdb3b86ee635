pub mod assets;
pub mod metadata;
pub mod report;
pub mod stage;
pub mod upload;

pub use assets::{MintedToken, StorageResult, StreamAsset};
pub use metadata::{metadata_text, ExtractedMetadata, MetadataMap};
pub use report::{CompletedUpload, FailedUpload, ProgressEvent, UploadReport};
pub use stage::UploadStage;
pub use upload::{FileDescriptor, JobOutcome, UploadJob};
