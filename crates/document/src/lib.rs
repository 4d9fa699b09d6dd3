//! Quotation PDF rendering.
//!
//! Rendering is split in two steps: [`layout::build_layout`] turns a
//! [`QuotationDocument`] into positioned text and rules (pure, testable),
//! and [`render::render_pdf`] draws that layout with `printpdf`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod error;
pub mod format;
pub mod layout;
pub mod render;

pub use error::DocumentError;
pub use layout::{build_layout, DocumentLayout};

/// Letterhead name used when none is configured.
pub const DEFAULT_COMPANY_NAME: &str = "ROTULOS FREER S.A.";

/// Everything printed on a quotation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDocument {
    pub company_name: String,
    pub sequence_number: String,
    pub date: NaiveDate,
    pub client_name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub project_title: Option<String>,
    pub description: String,
    pub delivery_days: Option<i32>,
    pub validity_days: Option<i32>,
    pub lines: Vec<DocumentLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLine {
    pub quantity: Decimal,
    pub description: String,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

/// Lay out and render a quotation to PDF bytes.
pub fn render_quotation(document: &QuotationDocument) -> Result<Vec<u8>, DocumentError> {
    let layout = build_layout(document);
    let title = format!("Cotizacion {}", document.sequence_number);
    let bytes = render::render_pdf(&layout, &title)?;
    tracing::debug!(
        sequence_number = %document.sequence_number,
        pages = layout.pages.len(),
        size = bytes.len(),
        "Rendered quotation PDF"
    );
    Ok(bytes)
}
