use crate::keys::{content_digest, content_id, content_key};
use crate::traits::{PinMetadata, StorageClient, StorageError, StorageOpResult, StoredObject};
use crate::StorageProvider;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local content-addressed filesystem storage
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/beatschain/content")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageOpResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path
    ///
    /// Keys are generated from hex digests, but the traversal check stays in place for
    /// keys derived from caller-supplied content ids.
    fn key_to_path(&self, storage_key: &str) -> StorageOpResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for a storage key
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageOpResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageOpResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Read back stored content by its identifier.
    pub async fn read(&self, content_id: &str) -> StorageOpResult<Vec<u8>> {
        let key = content_key(content_id)
            .ok_or_else(|| StorageError::InvalidKey(content_id.to_string()))?;
        let path = self.key_to_path(&key)?;
        Ok(fs::read(&path).await?)
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
        metadata: &PinMetadata,
    ) -> StorageOpResult<StoredObject> {
        let digest = content_digest(&data);
        let id = content_id(&digest);
        let key = content_key(&id)
            .ok_or_else(|| StorageError::InvalidKey(format!("Invalid digest for {}", filename)))?;
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // Identical content maps to the same key; an existing file is already correct
        if !fs::try_exists(&path).await.unwrap_or(false) {
            self.write_file(&path, &data).await?;
        }

        let metadata_json = serde_json::to_vec_pretty(metadata)
            .map_err(|e| StorageError::UploadFailed(format!("Failed to encode metadata: {}", e)))?;
        self.write_file(&path.with_extension("json"), &metadata_json)
            .await?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            content_id = %id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            content_id: id,
            url,
        })
    }

    fn retrieval_url(&self, content_id: &str) -> String {
        match content_key(content_id) {
            Some(key) => self.generate_url(&key),
            None => self.generate_url(content_id),
        }
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::Local
    }
}
