//! Help center domain layer.
//!
//! Pure types and rules shared by the persistence and HTTP crates: the error
//! taxonomy, article kinds and form normalization, search helpers, and the
//! media storage abstraction with its filesystem backend.

pub mod article;
pub mod error;
pub mod media;
pub mod search;
pub mod types;
