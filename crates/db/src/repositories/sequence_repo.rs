//! Atomic sequence number allocation backed by `quotation_sequences`.
//!
//! One counter row per scope (a date for the daily scheme, `global` for the
//! global scheme). Allocation is a single `INSERT ... ON CONFLICT DO UPDATE`,
//! so the row lock it takes serializes concurrent submissions on the same
//! scope until the enclosing transaction ends. Rolling back the transaction
//! also rolls back the increment.

use chrono::NaiveDate;
use rotulos_core::sequence::SequenceScheme;
use sqlx::{PgConnection, PgPool};

/// Provides sequence number allocation.
pub struct SequenceRepo;

impl SequenceRepo {
    /// Allocate the next sequence number for `date` under `scheme`.
    ///
    /// A scope without a counter row is seeded from the highest counter
    /// already present in `quotations`, so numbers continue after rows that
    /// were inserted before the counter existed.
    pub async fn allocate(
        conn: &mut PgConnection,
        scheme: SequenceScheme,
        date: NaiveDate,
    ) -> Result<String, sqlx::Error> {
        let scope = scheme.scope(date);
        let pattern = scheme.sql_pattern(date);

        let counter: i64 = sqlx::query_scalar(
            "INSERT INTO quotation_sequences (scope, last_value)
             VALUES (
                $1,
                COALESCE(
                    (SELECT MAX(substring(sequence_number FROM $2)::BIGINT)
                     FROM quotations
                     WHERE sequence_number ~ $2),
                    0
                ) + 1
             )
             ON CONFLICT (scope) DO UPDATE
                SET last_value = quotation_sequences.last_value + 1,
                    updated_at = NOW()
             RETURNING last_value",
        )
        .bind(&scope)
        .bind(&pattern)
        .fetch_one(conn)
        .await?;

        // last_value has a CHECK (> 0) constraint.
        let sequence_number = scheme.format(date, counter as u64);
        tracing::debug!(%scope, counter, %sequence_number, "Allocated sequence number");
        Ok(sequence_number)
    }

    /// Current counter value for a scope, if any number was allocated.
    pub async fn current(
        pool: &PgPool,
        scheme: SequenceScheme,
        date: NaiveDate,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT last_value FROM quotation_sequences WHERE scope = $1")
            .bind(scheme.scope(date))
            .fetch_optional(pool)
            .await
    }
}
