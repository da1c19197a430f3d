//! Help center web application library.
//!
//! Exposes the building blocks (config, state, error handling, catalog
//! service, routes, templates) so integration tests and the binary
//! entrypoint can both access them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
