use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rotulos_core::sequence::SequenceScheme;
use rotulos_document::DEFAULT_COMPANY_NAME;
use rotulos_storage::{StorageConfig, StorageError};

/// A configuration value that is missing or cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a submission does when the PDF upload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadFailurePolicy {
    /// Roll the quotation back and report the failure.
    #[default]
    Strict,
    /// Keep the quotation without a stored PDF and log a warning.
    BestEffort,
}

impl UploadFailurePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "best_effort" | "best-effort" => Some(Self::BestEffort),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub sequence_scheme: SequenceScheme,
    /// Offset used to decide the business date of a submission.
    pub business_offset: FixedOffset,
    pub upload_failure_policy: UploadFailurePolicy,
    /// Lifetime of download links shown after a submission.
    pub presigned_url_ttl_secs: u64,
    /// Enables `POST /api/v1/admin/reset`.
    pub allow_reset: bool,
    /// Letterhead printed on every quotation.
    pub company_name: String,
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `DATABASE_URL`              | required                |
    /// | `DB_MAX_CONNECTIONS`        | `10`                    |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SEQUENCE_SCHEME`           | `daily`                 |
    /// | `BUSINESS_UTC_OFFSET_HOURS` | `-6`                    |
    /// | `UPLOAD_FAILURE_POLICY`     | `strict`                |
    /// | `PRESIGNED_URL_TTL_SECS`    | `3600`                  |
    /// | `ALLOW_RESET`               | `false`                 |
    /// | `COMPANY_NAME`              | `ROTULOS FREER S.A.`    |
    ///
    /// Blob store variables (`STORAGE_BACKEND`, `S3_BUCKET`, `AWS_REGION`,
    /// ...) are read by [`StorageConfig::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", var("PORT"), 3000u16)?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 10u32)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;

        let sequence_scheme = match var("SEQUENCE_SCHEME") {
            None => SequenceScheme::default(),
            Some(raw) => SequenceScheme::from_name(&raw).map_err(|e| ConfigError::Invalid {
                name: "SEQUENCE_SCHEME",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };

        let offset_hours =
            parse_or("BUSINESS_UTC_OFFSET_HOURS", var("BUSINESS_UTC_OFFSET_HOURS"), -6i32)?;
        let business_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                name: "BUSINESS_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
                reason: "must be between -23 and 23".into(),
            })?;

        let upload_failure_policy = match var("UPLOAD_FAILURE_POLICY") {
            None => UploadFailurePolicy::default(),
            Some(raw) => {
                UploadFailurePolicy::from_name(&raw).ok_or_else(|| ConfigError::Invalid {
                    name: "UPLOAD_FAILURE_POLICY",
                    value: raw.clone(),
                    reason: "must be one of: strict, best_effort".into(),
                })?
            }
        };

        let presigned_url_ttl_secs =
            parse_or("PRESIGNED_URL_TTL_SECS", var("PRESIGNED_URL_TTL_SECS"), 3600u64)?;
        if presigned_url_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "PRESIGNED_URL_TTL_SECS",
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }

        let allow_reset = match var("ALLOW_RESET") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                name: "ALLOW_RESET",
                value: raw.clone(),
                reason: "must be true or false".into(),
            })?,
        };

        let company_name = var("COMPANY_NAME")
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());

        let storage = StorageConfig::from_vars(&lookup)?;

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            sequence_scheme,
            business_offset,
            upload_failure_policy,
            presigned_url_ttl_secs,
            allow_reset,
            company_name,
            storage,
        })
    }

    /// The calendar date at `now` in the business time zone.
    pub fn business_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.business_offset).date_naive()
    }

    pub fn presigned_url_ttl(&self) -> Duration {
        Duration::from_secs(self.presigned_url_ttl_secs)
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value: raw,
            }),
        },
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
