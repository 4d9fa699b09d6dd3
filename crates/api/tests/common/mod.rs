#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{FixedOffset, NaiveDate, Utc};
use http_body_util::BodyExt;
use rotulos_core::sequence::SequenceScheme;
use rotulos_storage::{BlobStore, MemoryBlobStore, StorageConfig, StorageError, StoredObject};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use rotulos_api::config::{ServerConfig, UploadFailurePolicy};
use rotulos_api::pages::FormPages;
use rotulos_api::routes;
use rotulos_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sequence_scheme: SequenceScheme::Daily,
        business_offset: FixedOffset::west_opt(6 * 3600).unwrap(),
        upload_failure_policy: UploadFailurePolicy::Strict,
        presigned_url_ttl_secs: 3600,
        allow_reset: false,
        company_name: "ROTULOS FREER S.A.".to_string(),
        storage: StorageConfig::memory(),
    }
}

/// Today's business date under [`test_config`].
pub fn today() -> NaiveDate {
    test_config().business_date(Utc::now())
}

/// Build the full application with the default test config and a fresh
/// in-memory blob store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(MemoryBlobStore::new()))
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    blob_store: Arc<dyn BlobStore>,
) -> Router {
    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let state = AppState {
        pool,
        config: Arc::new(config),
        blob_store,
        pages: Arc::new(FormPages::new().unwrap()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::form::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Blob store that always fails
// ---------------------------------------------------------------------------

/// Rejects every write; used to exercise the upload failure policies.
#[derive(Debug, Default)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend(format!("put_object '{key}': connection refused")))
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        Err(StorageError::NotFound {
            key: key.to_string(),
        })
    }

    async fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        _expires_in: Duration,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotFound {
            key: key.to_string(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

// ---------------------------------------------------------------------------
// Blob store that answers slowly
// ---------------------------------------------------------------------------

/// Stores into an inner memory store after a fixed delay.
#[derive(Debug)]
pub struct SlowBlobStore {
    pub inner: MemoryBlobStore,
    pub delay: Duration,
}

#[async_trait]
impl BlobStore for SlowBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(key, bytes, content_type).await
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        self.inner.presigned_get_url(key, expires_in).await
    }

    fn backend_name(&self) -> &'static str {
        "slow"
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an urlencoded form built from `fields`.
pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Text drawn on every page of a PDF, in page order.
pub fn pdf_text(bytes: &[u8]) -> String {
    let pdf = lopdf::Document::load_mem(bytes).expect("response must be a readable PDF");
    let pages: Vec<u32> = pdf.get_pages().keys().copied().collect();
    pdf.extract_text(&pages).unwrap()
}

/// The `Location` header of a redirect.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// A valid JSON quotation with two items (subtotal 291.00).
pub fn sample_quotation(client: &str) -> serde_json::Value {
    serde_json::json!({
        "client_name": client,
        "phone": "2222-3333",
        "description": "Rotulo luminoso\nInstalado en fachada",
        "delivery_days": 10,
        "items": [
            { "cantidad": 2, "detalle": "Letras en relieve", "precio": "125.50" },
            { "cantidad": 1, "detalle": "Instalacion", "precio": 40 }
        ]
    })
}
