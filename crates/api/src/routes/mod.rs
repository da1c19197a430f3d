pub mod admin;
pub mod health;
pub mod pages;

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /errors              list (?q, category, featured, kind, limit)
/// /errors/{id}         get
/// /categories          categories with counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/errors", get(articles::list_articles))
        .route("/errors/{id}", get(articles::get_article))
        .route("/categories", get(articles::list_categories))
}
