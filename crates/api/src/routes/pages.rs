//! Public HTML routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Public pages mounted at the root.
///
/// ```text
/// GET /                  -> home
/// GET /errors            -> list_errors
/// GET /errors/{id}       -> error_detail
/// GET /categories        -> categories
/// GET /docs/{kind}       -> docs
/// GET /chatbot           -> chatbot (fragment)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/errors", get(pages::list_errors))
        .route("/errors/{id}", get(pages::error_detail))
        .route("/categories", get(pages::categories))
        .route("/docs/{kind}", get(pages::docs))
        .route("/chatbot", get(pages::chatbot))
}
