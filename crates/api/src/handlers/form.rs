//! Handlers for the HTML quotation form.
//!
//! ```text
//! GET  /                              form; ?contrato=<seq> adds a result flash
//! POST /                              submit, then 303 to /?contrato=<seq>
//! GET  /cotizaciones/{id}/pdf         stored PDF as attachment
//! GET  /cotizaciones/{id}/descargar   307 to a presigned link
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use rotulos_core::form::QuotationForm;
use rotulos_core::types::DbId;
use serde::Deserialize;

use crate::downloads::{ensure_quotation_exists, pdf_attachment, presigned_url, try_presign};
use crate::error::AppResult;
use crate::pages::{Flash, FlashKind, FormView};
use crate::state::AppState;
use crate::submission::{find_submitted, submit_quotation};

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    /// Sequence number of the quotation just submitted.
    pub contrato: Option<String>,
}

fn view(state: &AppState, form: QuotationForm, flash: Option<Flash>) -> FormView {
    FormView {
        company_name: state.config.company_name.clone(),
        form,
        flash,
    }
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn show_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Response {
    let mut status = StatusCode::OK;
    let flash = match query.contrato.as_deref().map(str::trim) {
        Some(sequence_number) if !sequence_number.is_empty() => {
            match result_flash(&state, sequence_number).await {
                Ok(flash) => Some(flash),
                Err(err) => {
                    tracing::error!(error = %err, sequence_number, "Quotation lookup failed");
                    status = err.status();
                    Some(Flash::new(FlashKind::Error, err.user_message()))
                }
            }
        }
        _ => None,
    };
    render(&state, status, QuotationForm::default(), flash)
}

/// The form page with `status`, or the JSON error if the template fails.
fn render(state: &AppState, status: StatusCode, form: QuotationForm, flash: Option<Flash>) -> Response {
    match state.pages.render_form(&view(state, form, flash)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Flash describing a submitted quotation.
async fn result_flash(state: &AppState, sequence_number: &str) -> AppResult<Flash> {
    let Some(quotation) = find_submitted(state, sequence_number).await? else {
        return Ok(Flash::new(
            FlashKind::Warning,
            format!("No se encontro la cotizacion {sequence_number}"),
        ));
    };

    let mut flash = match &quotation.storage_key {
        Some(key) => {
            let mut flash = Flash::new(FlashKind::Success, "Cotizacion creada y guardada en la nube");
            flash.download_url = try_presign(
                state.blob_store.as_ref(),
                key,
                state.config.presigned_url_ttl(),
            )
            .await;
            flash.quotation_id = Some(quotation.id);
            flash
        }
        None => Flash::new(
            FlashKind::Warning,
            "Cotizacion guardada, pero el PDF no se pudo subir a la nube",
        ),
    };
    flash.sequence_number = Some(quotation.sequence_number);
    Ok(flash)
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Submit the form. Errors re-render the form with the submitted values.
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<QuotationForm>) -> Response {
    let submitted = form.clone();
    let result = match form.into_input() {
        Ok(input) => submit_quotation(&state, input).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(outcome) => {
            let target = format!("/?contrato={}", urlencoding::encode(outcome.sequence_number()));
            Redirect::to(&target).into_response()
        }
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(error = %err, "Quotation submission failed");
            } else {
                tracing::debug!(error = %err, "Quotation submission rejected");
            }
            let flash = Flash::new(FlashKind::Error, err.user_message());
            render(&state, status, submitted, Some(flash))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /cotizaciones/{id}/pdf
// ---------------------------------------------------------------------------

pub async fn download_pdf(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let quotation = ensure_quotation_exists(&state, id).await?;
    pdf_attachment(&state, &quotation).await
}

// ---------------------------------------------------------------------------
// GET /cotizaciones/{id}/descargar
// ---------------------------------------------------------------------------

pub async fn redirect_to_download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Redirect> {
    let quotation = ensure_quotation_exists(&state, id).await?;
    let url = presigned_url(&state, &quotation, state.config.presigned_url_ttl()).await?;
    Ok(Redirect::temporary(&url))
}
