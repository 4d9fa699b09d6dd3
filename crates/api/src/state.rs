use std::sync::Arc;

use rotulos_storage::BlobStore;

use crate::config::ServerConfig;
use crate::pages::FormPages;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rotulos_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Where rendered PDFs are stored.
    pub blob_store: Arc<dyn BlobStore>,
    /// Compiled HTML templates.
    pub pages: Arc<FormPages>,
}
