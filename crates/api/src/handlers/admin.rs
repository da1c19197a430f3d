//! Admin pages: article listing, create, edit and delete.
//!
//! Writes answer `303 See Other` back to `/admin`. A submission with invalid
//! fields re-renders its form with `422` and the values as submitted.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use helpcenter_core::article::ArticleKind;
use helpcenter_core::error::{CoreError, FieldErrors};
use helpcenter_core::types::DbId;
use helpcenter_db::models::error_article::{ArticleFilter, ErrorArticle};
use helpcenter_db::repositories::ErrorArticleRepo;

use crate::catalog;
use crate::error::{AppError, PageError, PageResult};
use crate::forms::{ArticleForm, ArticleSubmission};
use crate::state::AppState;
use crate::views;

const ADMIN_PATH: &str = "/admin";

// ---------------------------------------------------------------------------
// Page contexts
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct KindOption {
    value: &'static str,
    label: &'static str,
}

/// Values the article form partial needs besides the submitted fields.
#[derive(Serialize)]
struct FormOptions {
    kinds: Vec<KindOption>,
    image_accept: String,
    video_accept: String,
    max_image_bytes: u64,
    max_video_bytes: u64,
}

impl FormOptions {
    fn new(state: &AppState) -> Self {
        let accept = |exts: &[String]| {
            exts.iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(",")
        };
        let policy = state.upload_policy();
        Self {
            kinds: ArticleKind::ALL
                .into_iter()
                .map(|k| KindOption {
                    value: k.as_str(),
                    label: k.section_label(),
                })
                .collect(),
            image_accept: accept(&policy.image_extensions),
            video_accept: accept(&policy.video_extensions),
            max_image_bytes: policy.max_image_bytes,
            max_video_bytes: policy.max_video_bytes,
        }
    }
}

#[derive(Serialize)]
struct AdminPage {
    articles: Vec<ErrorArticle>,
    form: ArticleForm,
    errors: FieldErrors,
    options: FormOptions,
}

#[derive(Serialize)]
struct EditPage {
    article: ErrorArticle,
    form: ArticleForm,
    errors: FieldErrors,
    options: FormOptions,
}

async fn render_admin(
    state: &AppState,
    form: ArticleForm,
    errors: FieldErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let articles = ErrorArticleRepo::list(&state.pool, &ArticleFilter::default()).await?;
    let page = AdminPage {
        articles,
        form,
        errors,
        options: FormOptions::new(state),
    };
    Ok((status, views::render("admin.html", &page)?).into_response())
}

fn render_edit(
    state: &AppState,
    article: ErrorArticle,
    form: ArticleForm,
    errors: FieldErrors,
    status: StatusCode,
) -> PageResult<Response> {
    let page = EditPage {
        article,
        form,
        errors,
        options: FormOptions::new(state),
    };
    Ok((status, views::render("admin_edit.html", &page)?).into_response())
}

/// Read a multipart submission, stating the upload limits when the body is
/// over the request size limit.
async fn read_submission(
    state: &AppState,
    multipart: Multipart,
) -> PageResult<ArticleSubmission> {
    match ArticleSubmission::from_multipart(multipart).await {
        Ok(submission) => Ok(submission),
        Err(AppError::PayloadTooLarge(reason)) => {
            let policy = state.upload_policy();
            tracing::debug!(%reason, limit = policy.max_request_bytes(), "Rejected oversize submission");
            Err(PageError(AppError::PayloadTooLarge(format!(
                "The submission is larger than {} bytes. Screenshots may be up to {} bytes each \
                 and the video up to {} bytes.",
                policy.max_request_bytes(),
                policy.max_image_bytes,
                policy.max_video_bytes,
            ))))
        }
        Err(e) => Err(PageError(e)),
    }
}

// ---------------------------------------------------------------------------
// GET /admin
// ---------------------------------------------------------------------------

/// GET /admin -- every article with delete controls, plus the create form.
pub async fn admin_panel(State(state): State<AppState>) -> PageResult<Response> {
    render_admin(
        &state,
        ArticleForm::blank(),
        FieldErrors::new(),
        StatusCode::OK,
    )
    .await
}

// ---------------------------------------------------------------------------
// POST /admin/errors
// ---------------------------------------------------------------------------

/// POST /admin/errors -- create an article from a multipart submission.
pub async fn create_article(
    State(state): State<AppState>,
    multipart: Multipart,
) -> PageResult<Response> {
    let submission = read_submission(&state, multipart).await?;
    let form = submission.form.clone();

    match catalog::create_article(&state, submission).await {
        Ok(_) => Ok(Redirect::to(ADMIN_PATH).into_response()),
        Err(AppError::Core(CoreError::FieldValidation(errors))) => {
            tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Rejected article submission");
            render_admin(&state, form, errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(e) => Err(PageError(e)),
    }
}

// ---------------------------------------------------------------------------
// GET /admin/errors/{id}/edit
// ---------------------------------------------------------------------------

/// GET /admin/errors/{id}/edit
pub async fn edit_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Response> {
    let article = catalog::find_article(&state.pool, id).await?;
    let form = ArticleForm::from_article(&article);
    render_edit(&state, article, form, FieldErrors::new(), StatusCode::OK)
}

// ---------------------------------------------------------------------------
// POST /admin/errors/{id}
// ---------------------------------------------------------------------------

/// POST /admin/errors/{id} -- replace an article from a multipart submission.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> PageResult<Response> {
    let submission = read_submission(&state, multipart).await?;
    let form = submission.form.clone();

    match catalog::update_article(&state, id, submission).await {
        Ok(_) => Ok(Redirect::to(ADMIN_PATH).into_response()),
        Err(AppError::Core(CoreError::FieldValidation(errors))) => {
            let article = catalog::find_article(&state.pool, id).await?;
            render_edit(
                &state,
                article,
                form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
        Err(e) => Err(PageError(e)),
    }
}

// ---------------------------------------------------------------------------
// POST /admin/errors/{id}/delete
// ---------------------------------------------------------------------------

/// POST /admin/errors/{id}/delete
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Redirect> {
    catalog::delete_article(&state, id).await?;
    Ok(Redirect::to(ADMIN_PATH))
}
