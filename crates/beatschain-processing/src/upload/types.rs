use beatschain_core::constants::ANONYMOUS_USER;
use beatschain_core::{FileDescriptor, MetadataMap};

/// One submission: the file, its bytes, the submitting user and their overrides.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub owner: String,
    pub file: FileDescriptor,
    pub data: Vec<u8>,
    pub overrides: MetadataMap,
}

impl UploadRequest {
    /// Anonymous request without overrides. The descriptor's declared size is what gets
    /// validated.
    pub fn new(file: FileDescriptor, data: Vec<u8>) -> Self {
        Self {
            owner: ANONYMOUS_USER.to_string(),
            file,
            data,
            overrides: MetadataMap::new(),
        }
    }

    /// Request whose descriptor size is taken from `data`.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let file = FileDescriptor::new(name, data.len() as u64, content_type);
        Self::new(file, data)
    }

    /// Wallet address of the submitting user; blank values keep the anonymous marker.
    pub fn with_owner(mut self, owner: Option<&str>) -> Self {
        if let Some(owner) = owner.map(str::trim).filter(|o| !o.is_empty()) {
            self.owner = owner.to_string();
        }
        self
    }

    pub fn with_overrides(mut self, overrides: MetadataMap) -> Self {
        self.overrides = overrides;
        self
    }
}
