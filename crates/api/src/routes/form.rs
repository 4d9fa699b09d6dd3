//! Route definitions for the HTML form (mounted at the root).

use axum::routing::get;
use axum::Router;

use crate::handlers::form;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::show_form).post(form::submit_form))
        .route("/cotizaciones/{id}/pdf", get(form::download_pdf))
        .route("/cotizaciones/{id}/descargar", get(form::redirect_to_download))
}
