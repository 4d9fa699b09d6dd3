//! Access to stored quotation PDFs, shared by the HTML and JSON surfaces.

use std::time::Duration;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use rotulos_core::error::CoreError;
use rotulos_core::naming::{pdf_filename, PDF_CONTENT_TYPE};
use rotulos_core::types::DbId;
use rotulos_db::models::quotation::Quotation;
use rotulos_db::repositories::QuotationRepo;
use rotulos_storage::BlobStore;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a quotation, returning 404 when it does not exist.
pub async fn ensure_quotation_exists(state: &AppState, id: DbId) -> AppResult<Quotation> {
    QuotationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quotation",
            id,
        }))
}

/// The blob key of a quotation's PDF, or 404 if none was stored.
pub fn stored_key(quotation: &Quotation) -> AppResult<&str> {
    quotation
        .storage_key
        .as_deref()
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Stored PDF for quotation",
            id: quotation.id,
        }))
}

/// Fetch the stored PDF and wrap it as a download attachment.
pub async fn pdf_attachment(state: &AppState, quotation: &Quotation) -> AppResult<Response> {
    let key = stored_key(quotation)?;
    let object = state.blob_store.get(key).await?;
    tracing::debug!(
        quotation_id = quotation.id,
        %key,
        size = object.bytes.len(),
        "Serving stored PDF"
    );

    let content_type = object
        .content_type
        .unwrap_or_else(|| PDF_CONTENT_TYPE.to_string());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        pdf_filename(&quotation.sequence_number)
    );
    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        object.bytes,
    )
        .into_response())
}

/// A presigned link for the quotation's PDF.
pub async fn presigned_url(
    state: &AppState,
    quotation: &Quotation,
    expires_in: Duration,
) -> AppResult<String> {
    let key = stored_key(quotation)?;
    Ok(state.blob_store.presigned_get_url(key, expires_in).await?)
}

/// Like [`presigned_url`] for a key, but a failure is only logged.
pub async fn try_presign(store: &dyn BlobStore, key: &str, expires_in: Duration) -> Option<String> {
    match store.presigned_get_url(key, expires_in).await {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::warn!(error = %err, %key, "Could not create download link");
            None
        }
    }
}
