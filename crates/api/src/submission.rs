//! Quotation submission: number, persist, render, upload.
//!
//! Everything up to the upload runs inside one transaction, so a failed
//! render or a strict upload failure leaves no row behind and the allocated
//! number is reused by the next submission. The counter row stays locked
//! until commit, which serializes submissions drawing from the same counter.
//!
//! The work runs on its own task, so a request that times out or is
//! cancelled after the upload still reaches commit or deletes the blob.

use chrono::Utc;
use rotulos_core::naming::{quotation_blob_key, PDF_CONTENT_TYPE};
use rotulos_core::quotation::{QuotationDraft, QuotationInput};
use rotulos_db::models::quotation::{CreateQuotation, Quotation, QuotationWithItems};
use rotulos_db::repositories::{LineItemRepo, QuotationRepo, SequenceRepo};
use rotulos_document::render_quotation;
use serde::Serialize;

use crate::config::UploadFailurePolicy;
use crate::documents::quotation_document;
use crate::downloads::try_presign;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub quotation: QuotationWithItems,
    /// `false` when the upload failed under the best-effort policy.
    pub pdf_stored: bool,
    /// Time-limited download link, when one could be created.
    pub download_url: Option<String>,
}

impl SubmissionOutcome {
    pub fn sequence_number(&self) -> &str {
        &self.quotation.quotation.sequence_number
    }
}

/// Validate, persist, render and upload a quotation.
///
/// Once started, the submission completes even if the caller stops waiting.
pub async fn submit_quotation(state: &AppState, input: QuotationInput) -> AppResult<SubmissionOutcome> {
    let draft = input.into_draft()?;
    let state = state.clone();
    tokio::spawn(async move { persist_and_upload(&state, draft).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Submission task failed: {e}")))?
}

async fn persist_and_upload(state: &AppState, draft: QuotationDraft) -> AppResult<SubmissionOutcome> {
    let config = &state.config;
    let contract_date = config.business_date(Utc::now());

    // Dropping `tx` on any early return rolls everything back.
    let mut tx = state.pool.begin().await?;

    let sequence_number =
        SequenceRepo::allocate(&mut *tx, config.sequence_scheme, contract_date).await?;
    let quotation = QuotationRepo::create(
        &mut *tx,
        &CreateQuotation {
            sequence_number: &sequence_number,
            contract_date,
            draft: &draft,
        },
    )
    .await?;
    let items = LineItemRepo::create_many(&mut *tx, quotation.id, &draft.items).await?;

    let document = quotation_document(&config.company_name, &quotation, &items);
    let pdf = tokio::task::spawn_blocking(move || render_quotation(&document))
        .await
        .map_err(|e| AppError::InternalError(format!("PDF render task failed: {e}")))??;

    let key = quotation_blob_key(&quotation.client_name, &sequence_number);
    let size = pdf.len();

    let (quotation, pdf_stored) = match state.blob_store.put(&key, pdf, PDF_CONTENT_TYPE).await {
        Ok(()) => {
            tracing::info!(%sequence_number, %key, size, "Uploaded quotation PDF");
            match QuotationRepo::set_storage_key(&mut *tx, quotation.id, &key).await {
                Ok(Some(updated)) => (updated, true),
                Ok(None) => {
                    discard_upload(state, &key).await;
                    return Err(AppError::InternalError(format!(
                        "quotation {} vanished before its storage key was set",
                        quotation.id
                    )));
                }
                Err(err) => {
                    discard_upload(state, &key).await;
                    return Err(err.into());
                }
            }
        }
        Err(err) => match config.upload_failure_policy {
            UploadFailurePolicy::Strict => {
                tracing::error!(error = %err, %sequence_number, %key, "PDF upload failed, rolling back");
                return Err(err.into());
            }
            UploadFailurePolicy::BestEffort => {
                tracing::warn!(
                    error = %err,
                    %sequence_number,
                    %key,
                    "PDF upload failed, keeping quotation without a stored PDF"
                );
                (quotation, false)
            }
        },
    };

    if let Err(err) = tx.commit().await {
        if pdf_stored {
            discard_upload(state, &key).await;
        }
        return Err(err.into());
    }

    tracing::info!(
        quotation_id = quotation.id,
        %sequence_number,
        total = %quotation.total,
        pdf_stored,
        "Quotation created"
    );

    let download_url = if pdf_stored {
        try_presign(state.blob_store.as_ref(), &key, config.presigned_url_ttl()).await
    } else {
        None
    };

    Ok(SubmissionOutcome {
        quotation: QuotationWithItems { quotation, items },
        pdf_stored,
        download_url,
    })
}

/// Delete a blob whose row was never committed.
///
/// A crash between upload and commit still leaves the blob behind.
async fn discard_upload(state: &AppState, key: &str) {
    if let Err(err) = state.blob_store.delete(key).await {
        tracing::warn!(error = %err, %key, "Could not delete orphaned PDF");
    }
}

/// Quotation lookup for the post-submit redirect target.
pub async fn find_submitted(state: &AppState, sequence_number: &str) -> AppResult<Option<Quotation>> {
    Ok(QuotationRepo::find_by_sequence_number(&state.pool, sequence_number).await?)
}
