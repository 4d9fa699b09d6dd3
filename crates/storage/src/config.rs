//! Blob store configuration loaded from environment variables.

use crate::error::StorageError;

/// Which [`BlobStore`](crate::BlobStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

impl StorageBackend {
    /// Parse from the `STORAGE_BACKEND` setting.
    pub fn from_name(name: &str) -> Result<Self, StorageError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(StorageError::Config(format!(
                "Unknown storage backend '{other}'. Must be one of: s3, memory"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Static credentials. When absent the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    /// Enables path-style addressing.
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    /// In-memory storage, no credentials needed.
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            bucket: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
        }
    }

    /// Load from environment variables.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `STORAGE_BACKEND`       | `s3`             |
    /// | `S3_BUCKET`             | required for s3  |
    /// | `AWS_REGION`            | required for s3  |
    /// | `AWS_ACCESS_KEY_ID`     | provider chain   |
    /// | `AWS_SECRET_ACCESS_KEY` | provider chain   |
    /// | `S3_ENDPOINT_URL`       | AWS              |
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match get("STORAGE_BACKEND") {
            Some(name) => StorageBackend::from_name(&name)?,
            None => StorageBackend::S3,
        };

        let config = Self {
            backend,
            bucket: get("S3_BUCKET"),
            region: get("AWS_REGION"),
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            endpoint_url: get("S3_ENDPOINT_URL"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected backend has what it needs.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.backend == StorageBackend::S3 {
            if self.bucket.is_none() {
                return Err(StorageError::Config("S3_BUCKET must be set for the s3 backend".into()));
            }
            if self.region.is_none() {
                return Err(StorageError::Config("AWS_REGION must be set for the s3 backend".into()));
            }
            if self.access_key_id.is_some() != self.secret_access_key.is_some() {
                return Err(StorageError::Config(
                    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorageConfig, StorageError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn s3_is_the_default_backend() {
        let config = load(&[("S3_BUCKET", "cotizaciones"), ("AWS_REGION", "us-east-1")]).unwrap();
        assert_eq!(config.backend, StorageBackend::S3);
        assert_eq!(config.bucket.as_deref(), Some("cotizaciones"));
        assert!(config.access_key_id.is_none());
    }

    #[test]
    fn s3_requires_bucket_and_region() {
        assert!(load(&[("AWS_REGION", "us-east-1")]).is_err());
        assert!(load(&[("S3_BUCKET", "b")]).is_err());
        assert!(load(&[("S3_BUCKET", "  "), ("AWS_REGION", "us-east-1")]).is_err());
    }

    #[test]
    fn partial_static_credentials_rejected() {
        let result = load(&[
            ("S3_BUCKET", "b"),
            ("AWS_REGION", "us-east-1"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
        ]);
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[test]
    fn memory_backend_needs_nothing() {
        let config = load(&[("STORAGE_BACKEND", "Memory")]).unwrap();
        assert_eq!(config.backend, StorageBackend::Memory);
    }

    #[test]
    fn unknown_backend_rejected() {
        assert!(load(&[("STORAGE_BACKEND", "ftp")]).is_err());
    }

    #[test]
    fn backend_names() {
        assert_eq!(StorageBackend::S3.name(), "s3");
        assert_eq!(StorageBackend::Memory.name(), "memory");
    }
}
