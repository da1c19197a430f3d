//! Read-only JSON API over the article catalog.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use helpcenter_core::article::ArticleKind;
use helpcenter_core::search::{clamp_limit, normalize_filter, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helpcenter_core::types::DbId;
use helpcenter_db::models::error_article::ArticleFilter;
use helpcenter_db::repositories::ErrorArticleRepo;

use crate::catalog;
use crate::error::AppResult;
use crate::query::ListArticlesParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /errors
// ---------------------------------------------------------------------------

/// List articles, newest first.
///
/// Query: `q` (substring search), `category`, `featured`, `kind`, `limit`
/// (default 50, max 200).
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListArticlesParams>,
) -> AppResult<impl IntoResponse> {
    let kind = normalize_filter(params.kind.as_deref())
        .map(|k| k.parse::<ArticleKind>())
        .transpose()?;

    let filter = ArticleFilter {
        query: normalize_filter(params.q.as_deref()),
        category: normalize_filter(params.category.as_deref()),
        featured: params.featured,
        kind,
        limit: Some(clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT)),
    };
    let items = ErrorArticleRepo::list(&state.pool, &filter).await?;
    tracing::debug!(count = items.len(), "Listed articles");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /errors/{id}
// ---------------------------------------------------------------------------

/// Get a single article by ID.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = catalog::find_article(&state.pool, id).await?;
    Ok(Json(DataResponse { data: article }))
}

// ---------------------------------------------------------------------------
// GET /categories
// ---------------------------------------------------------------------------

/// Categories with article counts, alphabetically.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = ErrorArticleRepo::category_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}
