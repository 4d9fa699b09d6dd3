//! Handlers for the `/admin` resource.
//!
//! Destructive operations here are refused unless `ALLOW_RESET` is enabled.

use axum::extract::State;
use axum::Json;
use rotulos_core::error::CoreError;
use rotulos_db::repositories::QuotationRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub reset: bool,
}

/// POST /api/v1/admin/reset
///
/// Remove every quotation, line item and sequence counter. Stored PDFs are
/// left in the blob store.
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<DataResponse<ResetResult>>> {
    if !state.config.allow_reset {
        return Err(AppError::Core(CoreError::Forbidden(
            "Reset is disabled. Set ALLOW_RESET=true to enable it.".into(),
        )));
    }

    QuotationRepo::reset_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: ResetResult { reset: true },
    }))
}
