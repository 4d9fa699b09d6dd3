//! Server-rendered quotation form.

use rotulos_core::form::QuotationForm;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{AppError, AppResult};

const FORM_TEMPLATE: &str = "quotation_form.html";

/// Flash message severity, used as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
    pub sequence_number: Option<String>,
    pub download_url: Option<String>,
    /// Enables the proxy download link.
    pub quotation_id: Option<i64>,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sequence_number: None,
            download_url: None,
            quotation_id: None,
        }
    }
}

/// Everything the form template needs.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub company_name: String,
    /// Submitted values to refill after an error; empty on a fresh form.
    pub form: QuotationForm,
    pub flash: Option<Flash>,
}

/// Compiled templates, built once at startup.
pub struct FormPages {
    tera: Tera,
}

impl FormPages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            FORM_TEMPLATE,
            include_str!("../templates/quotation_form.html"),
        )?;
        Ok(Self { tera })
    }

    pub fn render_form(&self, view: &FormView) -> AppResult<String> {
        let context = Context::from_serialize(view)
            .map_err(|e| AppError::InternalError(format!("form context: {e}")))?;
        self.tera
            .render(FORM_TEMPLATE, &context)
            .map_err(|e| AppError::InternalError(format!("form template: {e}")))
    }
}
