//! Shared query parameter types for API handlers.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Shortest and longest lifetime accepted for a requested download link.
pub const MIN_LINK_TTL_SECS: u64 = 60;
pub const MAX_LINK_TTL_SECS: u64 = 7 * 24 * 3600;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// `?expires_in_secs=` for download links.
#[derive(Debug, Deserialize)]
pub struct DownloadUrlParams {
    pub expires_in_secs: Option<u64>,
}

impl DownloadUrlParams {
    /// Requested lifetime clamped to the accepted range, or `default`.
    pub fn expires_in(&self, default: Duration) -> Duration {
        match self.expires_in_secs {
            Some(secs) => Duration::from_secs(secs.clamp(MIN_LINK_TTL_SECS, MAX_LINK_TTL_SECS)),
            None => default,
        }
    }
}
