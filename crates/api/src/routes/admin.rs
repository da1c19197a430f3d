//! Admin HTML routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// GET  /                     -> admin_panel
/// POST /errors               -> create_article (multipart)
/// GET  /errors/{id}/edit     -> edit_article
/// POST /errors/{id}          -> update_article (multipart)
/// POST /errors/{id}/delete   -> delete_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::admin_panel))
        .route("/errors", post(admin::create_article))
        .route("/errors/{id}/edit", get(admin::edit_article))
        .route("/errors/{id}", post(admin::update_article))
        .route("/errors/{id}/delete", post(admin::delete_article))
}
