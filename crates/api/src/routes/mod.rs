pub mod admin;
pub mod form;
pub mod health;
pub mod quotation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /quotations                                      list, create
/// /quotations/{id}                                 get with line items
/// /quotations/by-sequence/{sequence_number}        get by contract number
/// /quotations/{id}/pdf                             stored PDF (attachment)
/// /quotations/{id}/download-url                    presigned link
///
/// /admin/reset                                     wipe all data (ALLOW_RESET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/quotations", quotation::router())
        .nest("/admin", admin::router())
}
