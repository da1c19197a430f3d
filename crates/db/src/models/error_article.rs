//! Error article models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use helpcenter_core::article::{validate_not_blank, ArticleKind};
use helpcenter_core::types::{DbId, Timestamp};

/// A row from the `error_articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ErrorArticle {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: ArticleKind,
    pub title: String,
    pub category: String,
    pub short_description: Option<String>,
    pub customer_message: String,
    pub description: Option<String>,
    pub causes: Vec<String>,
    pub customer_steps: Vec<String>,
    pub support_steps: Vec<String>,
    pub guide_steps: Vec<String>,
    pub answer: Option<String>,
    pub tags: Vec<String>,
    pub screenshots: Vec<String>,
    pub video: Option<String>,
    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ErrorArticle {
    /// Every media reference held by this article, screenshots first.
    pub fn media_references(&self) -> Vec<String> {
        self.screenshots
            .iter()
            .cloned()
            .chain(self.video.clone())
            .collect()
    }
}

/// DTO for creating an article. Also the full-replacement payload for updates.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CreateErrorArticle {
    #[serde(default)]
    pub kind: ArticleKind,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "Title must be at most 255 characters")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: String,
    #[validate(length(max = 255, message = "Short description must be at most 255 characters"))]
    pub short_description: Option<String>,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 500, message = "Customer message must be at most 500 characters")
    )]
    pub customer_message: String,
    pub description: Option<String>,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub customer_steps: Vec<String>,
    #[serde(default)]
    pub support_steps: Vec<String>,
    #[serde(default)]
    pub guide_steps: Vec<String>,
    pub answer: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Filters for listing articles. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Case-insensitive substring over title, customer message, category and
    /// short description.
    pub query: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub kind: Option<ArticleKind>,
    pub limit: Option<i64>,
}

impl ArticleFilter {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}

/// One entry of the categories overview.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}
