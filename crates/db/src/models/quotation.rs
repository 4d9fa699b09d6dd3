//! Quotation entity model and DTOs.

use chrono::NaiveDate;
use rotulos_core::quotation::QuotationDraft;
use rotulos_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::line_item::LineItem;

/// A row from the `quotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quotation {
    pub id: DbId,
    pub sequence_number: String,
    pub client_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_title: Option<String>,
    pub description: String,
    pub delivery_days: Option<i32>,
    pub validity_days: Option<i32>,
    pub contract_date: NaiveDate,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Object-store key of the rendered PDF. `None` until the upload succeeds.
    pub storage_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO: a validated draft plus its allocated number and date.
#[derive(Debug, Clone, Copy)]
pub struct CreateQuotation<'a> {
    pub sequence_number: &'a str,
    pub contract_date: NaiveDate,
    pub draft: &'a QuotationDraft,
}

/// A quotation together with its line items, in position order.
#[derive(Debug, Clone, Serialize)]
pub struct QuotationWithItems {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<LineItem>,
}
