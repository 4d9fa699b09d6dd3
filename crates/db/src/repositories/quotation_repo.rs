//! Repository for the `quotations` table.

use sqlx::{PgConnection, PgPool};
use rotulos_core::types::DbId;

use crate::models::quotation::{CreateQuotation, Quotation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, sequence_number, client_name, contact_name, email, phone, \
    project_title, description, delivery_days, validity_days, contract_date, \
    subtotal, tax, total, storage_key, created_at, updated_at";

/// Provides persistence operations for quotations.
pub struct QuotationRepo;

impl QuotationRepo {
    /// Insert a new quotation without a storage key, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateQuotation<'_>,
    ) -> Result<Quotation, sqlx::Error> {
        let draft = input.draft;
        let query = format!(
            "INSERT INTO quotations
                (sequence_number, client_name, contact_name, email, phone, project_title,
                 description, delivery_days, validity_days, contract_date,
                 subtotal, tax, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(input.sequence_number)
            .bind(&draft.client_name)
            .bind(&draft.contact_name)
            .bind(&draft.email)
            .bind(&draft.phone)
            .bind(&draft.project_title)
            .bind(&draft.description)
            .bind(draft.delivery_days)
            .bind(draft.validity_days)
            .bind(input.contract_date)
            .bind(draft.totals.subtotal)
            .bind(draft.totals.tax)
            .bind(draft.totals.total)
            .fetch_one(conn)
            .await
    }

    /// Record where the rendered PDF was stored.
    ///
    /// This is the only mutation a quotation accepts after creation.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_storage_key(
        conn: &mut PgConnection,
        id: DbId,
        storage_key: &str,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!(
            "UPDATE quotations SET storage_key = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .bind(storage_key)
            .fetch_optional(conn)
            .await
    }

    /// Find a quotation by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotations WHERE id = $1");
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a quotation by its human-facing sequence number.
    pub async fn find_by_sequence_number(
        pool: &PgPool,
        sequence_number: &str,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotations WHERE sequence_number = $1");
        sqlx::query_as::<_, Quotation>(&query)
            .bind(sequence_number)
            .fetch_optional(pool)
            .await
    }

    /// List quotations, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Quotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotations ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Remove every quotation, line item and sequence counter, restarting ids.
    pub async fn reset_all(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "TRUNCATE quotation_line_items, quotations, quotation_sequences RESTART IDENTITY",
        )
        .execute(pool)
        .await?;
        tracing::warn!("All quotations, line items and sequence counters were reset");
        Ok(())
    }
}
