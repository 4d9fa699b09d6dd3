//! Request handlers.
//!
//! [`form`] serves the HTML quotation form; [`quotation`] and [`admin`] serve
//! the JSON API under `/api/v1`. Handlers delegate to the repositories in
//! `rotulos_db` and to [`crate::submission`], and map errors via
//! [`crate::error::AppError`].

pub mod admin;
pub mod form;
pub mod quotation;
