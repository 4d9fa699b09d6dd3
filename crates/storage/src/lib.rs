//! Object storage for rendered quotation PDFs.
//!
//! [`BlobStore`] is the seam the API depends on. [`S3BlobStore`] talks to
//! S3 or any S3-compatible service; [`MemoryBlobStore`] keeps objects in
//! process memory for local development and tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod memory;
pub mod s3;

pub use config::{StorageBackend, StorageConfig};
pub use error::StorageError;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// A stored object's bytes and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Key-addressed blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Fetch the object stored under `key`.
    ///
    /// Returns [`StorageError::NotFound`] when no such object exists.
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Delete the object under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// A time-limited URL that allows downloading `key` without credentials.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration)
        -> Result<String, StorageError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Build the configured blob store.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::S3 => Arc::new(S3BlobStore::connect(config).await?),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
    };
    tracing::info!(backend = store.backend_name(), bucket = ?config.bucket, "Blob store ready");
    Ok(store)
}
