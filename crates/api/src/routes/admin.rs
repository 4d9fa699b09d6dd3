//! Route definitions for the `/admin` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /reset                   -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/reset", post(admin::reset))
}
