//! Public HTML pages: home, listings, detail, categories, docs sections and
//! the chatbot preview fragment.

use axum::extract::{Path, Query, State};
use axum::response::Html;
use serde::Serialize;

use helpcenter_core::article::ArticleKind;
use helpcenter_core::search::CHATBOT_PREVIEW_LIMIT;
use helpcenter_core::types::DbId;
use helpcenter_db::models::error_article::{ArticleFilter, CategoryCount, ErrorArticle};
use helpcenter_db::repositories::ErrorArticleRepo;

use crate::catalog;
use crate::error::PageResult;
use crate::query::SearchParams;
use crate::state::AppState;
use crate::views;

// ---------------------------------------------------------------------------
// Page contexts
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ListingPage {
    q: Option<String>,
    selected_category: Option<String>,
    categories: Vec<String>,
    articles: Vec<ErrorArticle>,
    chatbot: Option<ChatbotPreview>,
}

#[derive(Serialize)]
struct ChatbotPreview {
    q: String,
    articles: Vec<ErrorArticle>,
}

#[derive(Serialize)]
struct ChatbotFragment {
    chatbot: Option<ChatbotPreview>,
}

#[derive(Serialize)]
struct DetailPage {
    article: ErrorArticle,
}

#[derive(Serialize)]
struct CategoriesPage {
    categories: Vec<CategoryCount>,
}

#[derive(Serialize)]
struct DocsPage {
    kind: ArticleKind,
    label: &'static str,
    articles: Vec<ErrorArticle>,
}

/// Top matches for `q`, as shown by the chatbot widget.
async fn chatbot_preview(state: &AppState, q: String) -> PageResult<ChatbotPreview> {
    let filter = ArticleFilter {
        limit: Some(CHATBOT_PREVIEW_LIMIT),
        ..ArticleFilter::search(q.clone())
    };
    let articles = ErrorArticleRepo::list(&state.pool, &filter).await?;
    Ok(ChatbotPreview { q, articles })
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// GET / -- featured articles, or one category when `?category=` is set.
///
/// `?q=` narrows the shown articles and fills the chatbot preview.
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> PageResult<Html<String>> {
    let q = params.query();
    let selected_category = params.category();

    let filter = ArticleFilter {
        query: q.clone(),
        featured: selected_category.is_none().then_some(true),
        category: selected_category.clone(),
        ..ArticleFilter::default()
    };
    let articles = ErrorArticleRepo::list(&state.pool, &filter).await?;
    let categories = ErrorArticleRepo::categories(&state.pool).await?;

    let chatbot = match q.clone() {
        Some(q) => Some(chatbot_preview(&state, q).await?),
        None => None,
    };

    let page = ListingPage {
        q,
        selected_category,
        categories,
        articles,
        chatbot,
    };
    Ok(views::render("index.html", &page)?)
}

// ---------------------------------------------------------------------------
// GET /errors
// ---------------------------------------------------------------------------

/// GET /errors -- every article, filtered by `?q=` and `?category=`.
pub async fn list_errors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> PageResult<Html<String>> {
    let filter = ArticleFilter {
        query: params.query(),
        category: params.category(),
        ..ArticleFilter::default()
    };
    let articles = ErrorArticleRepo::list(&state.pool, &filter).await?;
    let categories = ErrorArticleRepo::categories(&state.pool).await?;
    tracing::debug!(count = articles.len(), "Listed articles");

    let page = ListingPage {
        q: filter.query,
        selected_category: filter.category,
        categories,
        articles,
        chatbot: None,
    };
    Ok(views::render("errors.html", &page)?)
}

// ---------------------------------------------------------------------------
// GET /errors/{id}
// ---------------------------------------------------------------------------

/// GET /errors/{id}
pub async fn error_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let article = catalog::find_article(&state.pool, id).await?;
    Ok(views::render("error_detail.html", &DetailPage { article })?)
}

// ---------------------------------------------------------------------------
// GET /categories
// ---------------------------------------------------------------------------

/// GET /categories -- categories with article counts.
pub async fn categories(State(state): State<AppState>) -> PageResult<Html<String>> {
    let categories = ErrorArticleRepo::category_counts(&state.pool).await?;
    Ok(views::render("categories.html", &CategoriesPage { categories })?)
}

// ---------------------------------------------------------------------------
// GET /docs/{kind}
// ---------------------------------------------------------------------------

/// GET /docs/{kind} -- articles of one kind. Unknown kinds are a 400.
pub async fn docs(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> PageResult<Html<String>> {
    let kind: ArticleKind = kind.parse()?;
    let filter = ArticleFilter {
        kind: Some(kind),
        ..ArticleFilter::default()
    };
    let articles = ErrorArticleRepo::list(&state.pool, &filter).await?;

    let page = DocsPage {
        kind,
        label: kind.section_label(),
        articles,
    };
    Ok(views::render("docs.html", &page)?)
}

// ---------------------------------------------------------------------------
// GET /chatbot
// ---------------------------------------------------------------------------

/// GET /chatbot?q= -- the chatbot preview as a standalone fragment.
pub async fn chatbot(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> PageResult<Html<String>> {
    let chatbot = match params.query() {
        Some(q) => Some(chatbot_preview(&state, q).await?),
        None => None,
    };
    Ok(views::render("partials/chatbot.html", &ChatbotFragment { chatbot })?)
}
