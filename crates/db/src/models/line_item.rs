//! Line item entity model.

use rotulos_core::types::DbId;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quotation_line_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineItem {
    pub id: DbId,
    pub quotation_id: DbId,
    pub position: i32,
    pub quantity: Decimal,
    pub description: String,
    pub unit_price: Decimal,
    pub amount: Decimal,
}
