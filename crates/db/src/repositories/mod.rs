//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! `&PgPool`; writes that belong to the submission transaction take
//! `&mut PgConnection` so callers can pass `&mut *tx`.

pub mod line_item_repo;
pub mod quotation_repo;
pub mod sequence_repo;

pub use line_item_repo::LineItemRepo;
pub use quotation_repo::QuotationRepo;
pub use sequence_repo::SequenceRepo;
