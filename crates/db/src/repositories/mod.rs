//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod error_article_repo;

pub use error_article_repo::ErrorArticleRepo;
