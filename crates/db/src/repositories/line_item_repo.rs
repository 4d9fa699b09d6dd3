//! Repository for the `quotation_line_items` table.

use rotulos_core::pricing::PricedLineItem;
use rotulos_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::line_item::LineItem;

const COLUMNS: &str = "id, quotation_id, position, quantity, description, unit_price, amount";

/// Provides persistence operations for line items. Line items have no
/// lifecycle of their own; they are written once with their quotation.
pub struct LineItemRepo;

impl LineItemRepo {
    /// Insert all items of a quotation, returning the rows in position order.
    pub async fn create_many(
        conn: &mut PgConnection,
        quotation_id: DbId,
        items: &[PricedLineItem],
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotation_line_items
                (quotation_id, position, quantity, description, unit_price, amount)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, LineItem>(&query)
                .bind(quotation_id)
                .bind(item.position)
                .bind(item.quantity)
                .bind(&item.description)
                .bind(item.unit_price)
                .bind(item.amount)
                .fetch_one(&mut *conn)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// List the items of a quotation in position order.
    pub async fn list_by_quotation(
        pool: &PgPool,
        quotation_id: DbId,
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotation_line_items WHERE quotation_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(quotation_id)
            .fetch_all(pool)
            .await
    }
}
