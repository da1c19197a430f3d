//! Admin write operations on the article catalog.
//!
//! Coordinates validation, media storage and persistence. Every submission
//! is validated in full before any file is written; cleanup of media that is
//! no longer referenced is best-effort and never fails the operation.

use helpcenter_core::article::ENTITY_NAME;
use helpcenter_core::error::{push_field_error, CoreError, FieldErrors};
use helpcenter_core::media::{MediaError, MediaKind, MediaStorage, UploadPolicy};
use helpcenter_core::types::DbId;
use helpcenter_db::models::error_article::{CreateErrorArticle, ErrorArticle};
use helpcenter_db::repositories::ErrorArticleRepo;

use crate::error::{AppError, AppResult};
use crate::forms::ArticleSubmission;
use crate::state::AppState;

/// References produced by storing a submission's uploads.
#[derive(Debug, Default)]
struct StoredMedia {
    screenshots: Vec<String>,
    video: Option<String>,
}

impl StoredMedia {
    fn references(&self) -> Vec<String> {
        self.screenshots.iter().cloned().chain(self.video.clone()).collect()
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY_NAME,
        id,
    })
}

/// Fetch an article, mapping a missing row to `NotFound`.
pub async fn find_article(pool: &sqlx::PgPool, id: DbId) -> AppResult<ErrorArticle> {
    ErrorArticleRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check every upload against the policy, keyed by form field.
fn check_uploads(policy: &UploadPolicy, submission: &ArticleSubmission) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for upload in submission.uploads() {
        let size = upload.bytes.len() as u64;
        if let Err(message) = policy.check(upload.kind, &upload.file_name, size) {
            push_field_error(&mut errors, upload.kind.form_field(), message);
        }
    }
    errors
}

/// Validate text fields and uploads together, reporting all problems at once.
fn validate(
    policy: &UploadPolicy,
    submission: &ArticleSubmission,
) -> AppResult<CreateErrorArticle> {
    let upload_errors = check_uploads(policy, submission);
    match submission.form.to_input() {
        Ok(input) if upload_errors.is_empty() => Ok(input),
        Ok(_) => Err(CoreError::FieldValidation(upload_errors).into()),
        Err(mut errors) => {
            for (field, messages) in upload_errors {
                errors.entry(field).or_default().extend(messages);
            }
            Err(CoreError::FieldValidation(errors).into())
        }
    }
}

// ---------------------------------------------------------------------------
// Media helpers
// ---------------------------------------------------------------------------

/// Store every upload. If one write fails, the ones already written are
/// removed before the error is returned.
async fn store_uploads(
    media: &dyn MediaStorage,
    submission: &ArticleSubmission,
) -> Result<StoredMedia, MediaError> {
    let mut stored = StoredMedia::default();
    for upload in submission.uploads() {
        match media.store(upload.kind, &upload.file_name, &upload.bytes).await {
            Ok(reference) => match upload.kind {
                MediaKind::Image => stored.screenshots.push(reference),
                MediaKind::Video => stored.video = Some(reference),
            },
            Err(e) => {
                discard_media(media, &stored.references()).await;
                return Err(e);
            }
        }
    }
    Ok(stored)
}

/// Best-effort removal of media files. Failures are logged and ignored.
async fn discard_media(media: &dyn MediaStorage, references: &[String]) {
    for reference in references {
        if let Err(e) = media.delete(reference).await {
            tracing::warn!(%reference, error = %e, "Failed to remove media file");
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create an article from an admin submission.
///
/// Nothing is stored or persisted unless the whole submission is valid. If
/// the insert fails, the files written for it are removed again.
pub async fn create_article(
    state: &AppState,
    submission: ArticleSubmission,
) -> AppResult<ErrorArticle> {
    let mut input = validate(state.upload_policy(), &submission)?;

    let stored = store_uploads(state.media.as_ref(), &submission).await?;
    input.screenshots = stored.screenshots.clone();
    input.video = stored.video.clone();

    match ErrorArticleRepo::create(&state.pool, &input).await {
        Ok(article) => {
            tracing::info!(
                article_id = article.id,
                title = %article.title,
                screenshots = article.screenshots.len(),
                has_video = article.video.is_some(),
                "Article created"
            );
            Ok(article)
        }
        Err(e) => {
            discard_media(state.media.as_ref(), &stored.references()).await;
            Err(e.into())
        }
    }
}

/// Replace an article's fields from an edit submission.
///
/// New screenshots are appended after the kept ones; a new video replaces
/// the current one. Removal requests only apply to media the article
/// actually holds. Dropped media is deleted after the row is updated.
pub async fn update_article(
    state: &AppState,
    id: DbId,
    submission: ArticleSubmission,
) -> AppResult<ErrorArticle> {
    let existing = find_article(&state.pool, id).await?;

    let mut input = validate(state.upload_policy(), &submission)?;

    let stored = store_uploads(state.media.as_ref(), &submission).await?;

    let (kept, mut dropped): (Vec<String>, Vec<String>) = existing
        .screenshots
        .iter()
        .cloned()
        .partition(|s| !submission.remove_screenshots.contains(s));
    input.screenshots = kept.into_iter().chain(stored.screenshots.clone()).collect();

    input.video = match (&stored.video, &existing.video) {
        (Some(new), old) => {
            dropped.extend(old.clone());
            Some(new.clone())
        }
        (None, Some(old)) if submission.remove_video => {
            dropped.push(old.clone());
            None
        }
        (None, old) => old.clone(),
    };

    let updated = match ErrorArticleRepo::update(&state.pool, id, &input).await {
        Ok(Some(article)) => article,
        Ok(None) => {
            discard_media(state.media.as_ref(), &stored.references()).await;
            return Err(not_found(id));
        }
        Err(e) => {
            discard_media(state.media.as_ref(), &stored.references()).await;
            return Err(e.into());
        }
    };

    discard_media(state.media.as_ref(), &dropped).await;

    tracing::info!(
        article_id = updated.id,
        added = stored.references().len(),
        removed = dropped.len(),
        "Article updated"
    );
    Ok(updated)
}

/// Delete an article and, best-effort, its media.
pub async fn delete_article(state: &AppState, id: DbId) -> AppResult<ErrorArticle> {
    let article = find_article(&state.pool, id).await?;

    discard_media(state.media.as_ref(), &article.media_references()).await;

    if !ErrorArticleRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(article_id = id, "Article deleted");
    Ok(article)
}
