//! Route definitions for the `/quotations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::quotation;
use crate::state::AppState;

/// Routes mounted at `/quotations`.
///
/// ```text
/// GET    /                                 -> list_quotations
/// POST   /                                 -> create_quotation
/// GET    /{id}                             -> get_quotation
/// GET    /by-sequence/{sequence_number}    -> get_quotation_by_sequence
/// GET    /{id}/pdf                         -> download_pdf
/// GET    /{id}/download-url                -> download_url
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(quotation::list_quotations).post(quotation::create_quotation),
        )
        .route("/{id}", get(quotation::get_quotation))
        .route(
            "/by-sequence/{sequence_number}",
            get(quotation::get_quotation_by_sequence),
        )
        .route("/{id}/pdf", get(quotation::download_pdf))
        .route("/{id}/download-url", get(quotation::download_url))
}
