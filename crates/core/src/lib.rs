//! Domain logic for the quotation service.
//!
//! Everything here is pure: input binding and validation, pricing, sequence
//! number formatting and blob key naming. No database or network access.

pub mod error;
pub mod form;
pub mod naming;
pub mod pricing;
pub mod quotation;
pub mod sequence;
pub mod types;
