//! BeatsChain Storage Library
//!
//! This crate provides the content storage abstraction used by the upload orchestrator
//! and its provider implementations: Pinata (IPFS pinning) and a local
//! content-addressed filesystem store.
//!
//! # Content identifiers
//!
//! - **Pinata**: the IPFS hash returned by the pinning API; retrieval URL is
//!   `{gateway}/ipfs/{cid}`.
//! - **Local**: `sha256-{hex digest}`; files live under `content/{hex digest}` and the
//!   retrieval URL is `{base_url}/content/{hex digest}`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-pinata")]
pub mod pinata;
pub mod traits;

// Re-export commonly used types
pub use beatschain_core::StorageProvider;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-pinata")]
pub use pinata::PinataStorage;
pub use traits::{PinMetadata, StorageClient, StorageError, StorageOpResult, StoredObject};
