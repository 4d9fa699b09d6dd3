//! Rotulos quotation server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! submission flow) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod documents;
pub mod downloads;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod submission;
