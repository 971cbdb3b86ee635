#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-pinata")]
use crate::PinataStorage;
use crate::{StorageClient, StorageError, StorageOpResult, StorageProvider};
use beatschain_core::StorageConfig;
use std::sync::Arc;

/// Create a storage client based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageOpResult<Arc<dyn StorageClient>> {
    match config.provider {
        #[cfg(feature = "storage-pinata")]
        StorageProvider::Pinata => {
            if !config.has_pinata_credentials() {
                tracing::warn!("Pinata credentials not configured; pin requests will be rejected");
            }
            let storage = PinataStorage::from_config(config)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-pinata"))]
        StorageProvider::Pinata => Err(StorageError::ConfigError(
            "Pinata storage provider not available (storage-pinata feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageProvider::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageProvider::Local => Err(StorageError::ConfigError(
            "Local storage provider not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
