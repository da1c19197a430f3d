//! Row models and DTOs.

pub mod error_article;
