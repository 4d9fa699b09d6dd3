//! S3 and S3-compatible blob store.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::{BlobStore, StoredObject};

/// Provider name attached to static credentials taken from configuration.
const STATIC_CREDENTIALS_PROVIDER: &str = "rotulos-static";

/// Blob store backed by a single S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Wrap an already configured client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from configuration.
    ///
    /// Static credentials are used when both key parts are configured,
    /// otherwise the default AWS provider chain applies.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| StorageError::Config("S3 bucket is not configured".into()))?;
        let region = config
            .region
            .clone()
            .ok_or_else(|| StorageError::Config("AWS region is not configured".into()))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                STATIC_CREDENTIALS_PROVIDER,
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::debug!(%bucket, endpoint = ?config.endpoint_url, "S3 client configured");
        Ok(Self::from_client(Client::from_conf(builder.build()), bucket))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| {
                StorageError::Backend(format!("put_object '{key}': {}", DisplayErrorContext(&err)))
            })?;
        tracing::debug!(bucket = %self.bucket, %key, size, "Uploaded object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let missing = err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key());
                if missing {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Backend(format!(
                        "get_object '{key}': {}",
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        let content_type = output.content_type().map(str::to_string);
        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StorageError::Backend(format!("reading '{key}': {err}")))?;

        Ok(StoredObject {
            bytes: data.into_bytes().to_vec(),
            content_type,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                StorageError::Backend(format!("delete_object '{key}': {}", DisplayErrorContext(&err)))
            })?;
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| StorageError::Config(format!("invalid presign expiry: {err}")))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| {
                StorageError::Backend(format!("presign '{key}': {}", DisplayErrorContext(&err)))
            })?;
        Ok(request.uri().to_string())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
