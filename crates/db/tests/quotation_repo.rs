//! Integration tests for quotation persistence and sequence allocation.
//!
//! Exercises the repository layer against a real database:
//! - Create a quotation with line items inside one transaction
//! - Storage key update and lookups
//! - Unique sequence number constraint
//! - Daily and global allocation, seeding, rollback and concurrency

use chrono::NaiveDate;
use rotulos_core::quotation::{LineItemInput, QuotationDraft, QuotationInput};
use rotulos_core::sequence::SequenceScheme;
use rotulos_db::models::quotation::CreateQuotation;
use rotulos_db::repositories::{LineItemRepo, QuotationRepo, SequenceRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn draft(client: &str) -> QuotationDraft {
    QuotationInput {
        client_name: client.to_string(),
        description: "Rotulo en aluminio compuesto".to_string(),
        delivery_days: Some(8),
        items: vec![
            LineItemInput {
                quantity: Decimal::new(2, 0),
                description: "Letras en relieve".to_string(),
                unit_price: Decimal::new(12_550, 2),
                amount: None,
            },
            LineItemInput {
                quantity: Decimal::new(1, 0),
                description: "Instalacion".to_string(),
                unit_price: Decimal::new(40, 0),
                amount: None,
            },
        ],
        ..Default::default()
    }
    .into_draft()
    .unwrap()
}

/// Allocate and insert in one committed transaction, like a submission does.
async fn submit(pool: &PgPool, scheme: SequenceScheme, date: NaiveDate, client: &str) -> String {
    let draft = draft(client);
    let mut tx = pool.begin().await.unwrap();
    let sequence_number = SequenceRepo::allocate(&mut *tx, scheme, date).await.unwrap();
    let quotation = QuotationRepo::create(
        &mut *tx,
        &CreateQuotation {
            sequence_number: &sequence_number,
            contract_date: date,
            draft: &draft,
        },
    )
    .await
    .unwrap();
    LineItemRepo::create_many(&mut *tx, quotation.id, &draft.items)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    sequence_number
}

// ---------------------------------------------------------------------------
// Quotation rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_quotation_with_items(pool: PgPool) {
    let sequence_number = submit(&pool, SequenceScheme::Daily, may_first(), "Ferreteria Central").await;
    assert_eq!(sequence_number, "2024-05-01-0001");

    let quotation = QuotationRepo::find_by_sequence_number(&pool, &sequence_number)
        .await
        .unwrap()
        .expect("quotation should exist");
    assert_eq!(quotation.client_name, "Ferreteria Central");
    assert_eq!(quotation.contract_date, may_first());
    assert_eq!(quotation.subtotal, Decimal::new(291, 0));
    assert_eq!(quotation.total, Decimal::new(32_883, 2));
    assert_eq!(quotation.tax, Decimal::new(3_783, 2));
    assert!(quotation.storage_key.is_none());

    let items = LineItemRepo::list_by_quotation(&pool, quotation.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].position, 0);
    assert_eq!(items[0].amount, Decimal::new(251, 0));
    assert_eq!(items[1].description, "Instalacion");

    let subtotal: Decimal = items.iter().map(|i| i.amount).sum();
    assert_eq!(subtotal, quotation.subtotal);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_storage_key_updates_row(pool: PgPool) {
    let sequence_number = submit(&pool, SequenceScheme::Daily, may_first(), "Soda Tica").await;
    let quotation = QuotationRepo::find_by_sequence_number(&pool, &sequence_number)
        .await
        .unwrap()
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let updated = QuotationRepo::set_storage_key(&mut conn, quotation.id, "SODA_TICA/x/cotizacion.pdf")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.storage_key.as_deref(), Some("SODA_TICA/x/cotizacion.pdf"));

    let missing = QuotationRepo::set_storage_key(&mut conn, 999_999, "nope").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_quotation_returns_none(pool: PgPool) {
    assert!(QuotationRepo::find_by_id(&pool, 424_242).await.unwrap().is_none());
    assert!(QuotationRepo::find_by_sequence_number(&pool, "2024-01-01-0001")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_sequence_number_violates_unique_constraint(pool: PgPool) {
    let draft = draft("Duplicado");
    let input = CreateQuotation {
        sequence_number: "2024-05-01-0001",
        contract_date: may_first(),
        draft: &draft,
    };
    let mut conn = pool.acquire().await.unwrap();
    QuotationRepo::create(&mut conn, &input).await.unwrap();

    let err = QuotationRepo::create(&mut conn, &input).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_quotations_sequence_number"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_newest_first(pool: PgPool) {
    for client in ["Uno", "Dos", "Tres"] {
        submit(&pool, SequenceScheme::Daily, may_first(), client).await;
    }
    let page = QuotationRepo::list(&pool, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].client_name, "Tres");
    assert_eq!(page[1].client_name, "Dos");

    let rest = QuotationRepo::list(&pool, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].client_name, "Uno");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_all_clears_rows_and_counters(pool: PgPool) {
    submit(&pool, SequenceScheme::Daily, may_first(), "Borrable").await;
    QuotationRepo::reset_all(&pool).await.unwrap();

    assert!(QuotationRepo::list(&pool, 10, 0).await.unwrap().is_empty());
    assert_eq!(
        SequenceRepo::current(&pool, SequenceScheme::Daily, may_first()).await.unwrap(),
        None
    );
    let again = submit(&pool, SequenceScheme::Daily, may_first(), "Nuevo").await;
    assert_eq!(again, "2024-05-01-0001");
}

// ---------------------------------------------------------------------------
// Sequence allocation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_numbers_increase_without_gaps(pool: PgPool) {
    let mut issued = Vec::new();
    for i in 0..5 {
        issued.push(submit(&pool, SequenceScheme::Daily, may_first(), &format!("Cliente {i}")).await);
    }
    assert_eq!(
        issued,
        vec![
            "2024-05-01-0001",
            "2024-05-01-0002",
            "2024-05-01-0003",
            "2024-05-01-0004",
            "2024-05-01-0005",
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_counter_restarts_on_new_date(pool: PgPool) {
    submit(&pool, SequenceScheme::Daily, may_first(), "Ayer").await;
    let next_day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let first = submit(&pool, SequenceScheme::Daily, next_day, "Hoy").await;
    assert_eq!(first, "2024-05-02-0001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_counter_is_seeded_from_existing_numbers(pool: PgPool) {
    // Rows written without going through the counter table.
    let draft = draft("Historico");
    let mut conn = pool.acquire().await.unwrap();
    for sequence_number in ["2024-05-01-0001", "2024-05-01-0002"] {
        QuotationRepo::create(
            &mut conn,
            &CreateQuotation {
                sequence_number,
                contract_date: may_first(),
                draft: &draft,
            },
        )
        .await
        .unwrap();
    }
    drop(conn);

    let next = submit(&pool, SequenceScheme::Daily, may_first(), "Siguiente").await;
    assert_eq!(next, "2024-05-01-0003");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rolled_back_allocation_is_reused(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let abandoned = SequenceRepo::allocate(&mut *tx, SequenceScheme::Daily, may_first())
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let committed = submit(&pool, SequenceScheme::Daily, may_first(), "Reintento").await;
    assert_eq!(abandoned, committed);
    assert_eq!(committed, "2024-05-01-0001");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn global_scheme_counts_across_dates(pool: PgPool) {
    let a = submit(&pool, SequenceScheme::Global, may_first(), "A").await;
    let b = submit(&pool, SequenceScheme::Global, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(), "B").await;
    assert_eq!(a, "2024-00001");
    assert_eq!(b, "2025-00002");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_allocations_never_collide(pool: PgPool) {
    const SUBMISSIONS: usize = 12;

    let tasks = (0..SUBMISSIONS).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            submit(&pool, SequenceScheme::Daily, may_first(), &format!("Concurrente {i}")).await
        })
    });
    let mut issued: Vec<String> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    issued.sort();
    issued.dedup();

    assert_eq!(issued.len(), SUBMISSIONS);
    let expected: Vec<String> = (1..=SUBMISSIONS as u64)
        .map(|n| SequenceScheme::Daily.format(may_first(), n))
        .collect();
    assert_eq!(issued, expected);
}
