//! Handlers for the `/quotations` JSON resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use rotulos_core::quotation::QuotationInput;
use rotulos_core::types::DbId;
use rotulos_db::models::quotation::{Quotation, QuotationWithItems};
use rotulos_db::repositories::{LineItemRepo, QuotationRepo};
use serde::Serialize;

use crate::downloads::{ensure_quotation_exists, pdf_attachment, presigned_url};
use crate::error::{AppError, AppResult};
use crate::query::{DownloadUrlParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::submission::{submit_quotation, SubmissionOutcome};

/// Response body for `GET /quotations/{id}/download-url`.
#[derive(Debug, Serialize)]
pub struct DownloadUrl {
    pub url: String,
    pub expires_in_secs: u64,
}

// ---------------------------------------------------------------------------
// GET /quotations
// ---------------------------------------------------------------------------

/// List quotations, newest first.
pub async fn list_quotations(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Quotation>>>> {
    let quotations = QuotationRepo::list(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: quotations }))
}

// ---------------------------------------------------------------------------
// POST /quotations
// ---------------------------------------------------------------------------

/// Create a quotation from JSON input. Same flow as the HTML form.
pub async fn create_quotation(
    State(state): State<AppState>,
    Json(input): Json<QuotationInput>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionOutcome>>)> {
    let outcome = submit_quotation(&state, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

// ---------------------------------------------------------------------------
// GET /quotations/{id}
// ---------------------------------------------------------------------------

pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuotationWithItems>>> {
    let quotation = ensure_quotation_exists(&state, id).await?;
    let items = LineItemRepo::list_by_quotation(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: QuotationWithItems { quotation, items },
    }))
}

// ---------------------------------------------------------------------------
// GET /quotations/by-sequence/{sequence_number}
// ---------------------------------------------------------------------------

pub async fn get_quotation_by_sequence(
    State(state): State<AppState>,
    Path(sequence_number): Path<String>,
) -> AppResult<Json<DataResponse<QuotationWithItems>>> {
    let quotation = QuotationRepo::find_by_sequence_number(&state.pool, &sequence_number)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    let items = LineItemRepo::list_by_quotation(&state.pool, quotation.id).await?;
    Ok(Json(DataResponse {
        data: QuotationWithItems { quotation, items },
    }))
}

// ---------------------------------------------------------------------------
// GET /quotations/{id}/pdf
// ---------------------------------------------------------------------------

/// Stream the stored PDF as an attachment.
pub async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let quotation = ensure_quotation_exists(&state, id).await?;
    pdf_attachment(&state, &quotation).await
}

// ---------------------------------------------------------------------------
// GET /quotations/{id}/download-url
// ---------------------------------------------------------------------------

/// Create a presigned link to the stored PDF.
pub async fn download_url(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DownloadUrlParams>,
) -> AppResult<Json<DataResponse<DownloadUrl>>> {
    let quotation = ensure_quotation_exists(&state, id).await?;
    let expires_in = params.expires_in(state.config.presigned_url_ttl());
    let url = presigned_url(&state, &quotation, expires_in).await?;
    Ok(Json(DataResponse {
        data: DownloadUrl {
            url,
            expires_in_secs: expires_in.as_secs(),
        },
    }))
}
