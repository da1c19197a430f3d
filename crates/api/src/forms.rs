//! Admin article form: multipart parsing and re-render values.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::StatusCode;
use serde::Serialize;
use validator::Validate;

use helpcenter_core::article::{
    collect_field_errors, non_blank, parse_checkbox, split_lines, ArticleKind,
};
use helpcenter_core::error::{push_field_error, FieldErrors};
use helpcenter_core::media::MediaKind;
use helpcenter_db::models::error_article::{CreateErrorArticle, ErrorArticle};

use crate::error::{AppError, AppResult};

/// Text values of the article form, exactly as submitted.
///
/// List fields hold the raw multi-line text so a rejected submission can be
/// shown back to the author unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleForm {
    pub kind: String,
    pub title: String,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub customer_message: String,
    pub causes: String,
    pub customer_steps: String,
    pub support_steps: String,
    pub guide_steps: String,
    pub answer: String,
    pub tags: String,
    pub featured: bool,
}

impl ArticleForm {
    /// An empty create form.
    pub fn blank() -> Self {
        Self {
            kind: ArticleKind::default().as_str().to_string(),
            ..Self::default()
        }
    }

    /// Pre-filled edit form for an existing article.
    pub fn from_article(article: &ErrorArticle) -> Self {
        Self {
            kind: article.kind.as_str().to_string(),
            title: article.title.clone(),
            category: article.category.clone(),
            short_description: article.short_description.clone().unwrap_or_default(),
            description: article.description.clone().unwrap_or_default(),
            customer_message: article.customer_message.clone(),
            causes: article.causes.join("\n"),
            customer_steps: article.customer_steps.join("\n"),
            support_steps: article.support_steps.join("\n"),
            guide_steps: article.guide_steps.join("\n"),
            answer: article.answer.clone().unwrap_or_default(),
            tags: article.tags.join(", "),
            featured: article.featured,
        }
    }

    /// Normalize and validate the text fields.
    ///
    /// Media fields of the result are left empty; the catalog service fills
    /// them once uploads are stored.
    pub fn to_input(&self) -> Result<CreateErrorArticle, FieldErrors> {
        let mut errors = FieldErrors::new();

        let kind = match non_blank(&self.kind) {
            None => ArticleKind::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                push_field_error(&mut errors, "kind", "Unknown article kind");
                ArticleKind::default()
            }),
        };

        let input = CreateErrorArticle {
            kind,
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            short_description: non_blank(&self.short_description),
            customer_message: self.customer_message.trim().to_string(),
            description: non_blank(&self.description),
            causes: split_lines(&self.causes),
            customer_steps: split_lines(&self.customer_steps),
            support_steps: split_lines(&self.support_steps),
            guide_steps: split_lines(&self.guide_steps),
            answer: non_blank(&self.answer),
            tags: split_tags(&self.tags),
            screenshots: Vec::new(),
            video: None,
            featured: self.featured,
        };

        if let Err(validation) = input.validate() {
            for (field, messages) in collect_field_errors(&validation) {
                errors.entry(field).or_default().extend(messages);
            }
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}

/// Tags accept both one-per-line and comma-separated input.
fn split_tags(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub kind: MediaKind,
    pub file_name: String,
    pub bytes: Bytes,
}

/// A parsed create or edit submission.
#[derive(Debug, Default)]
pub struct ArticleSubmission {
    pub form: ArticleForm,
    /// New screenshots, in submission order.
    pub screenshots: Vec<Upload>,
    pub video: Option<Upload>,
    /// Existing screenshot references to drop (edit only).
    pub remove_screenshots: Vec<String>,
    /// Drop the existing video (edit only).
    pub remove_video: bool,
}

impl ArticleSubmission {
    /// Every upload in the submission, screenshots first.
    pub fn uploads(&self) -> impl Iterator<Item = &Upload> {
        self.screenshots.iter().chain(self.video.as_ref())
    }

    /// Read the whole multipart body.
    ///
    /// File inputs left empty by the browser arrive as parts with an empty
    /// filename and no bytes; they are skipped. Unknown fields are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut submission = ArticleSubmission {
            form: ArticleForm::blank(),
            ..ArticleSubmission::default()
        };

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(kind) = MediaKind::ALL.into_iter().find(|k| k.form_field() == name) {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let upload = Upload {
                    kind,
                    file_name,
                    bytes,
                };
                match kind {
                    MediaKind::Image => submission.screenshots.push(upload),
                    MediaKind::Video => submission.video = Some(upload),
                }
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            let form = &mut submission.form;
            match name.as_str() {
                "kind" => form.kind = value,
                "title" => form.title = value,
                "category" => form.category = value,
                "short_description" => form.short_description = value,
                "description" => form.description = value,
                "customer_message" => form.customer_message = value,
                "causes" => form.causes = value,
                "customer_steps" => form.customer_steps = value,
                "support_steps" => form.support_steps = value,
                "guide_steps" | "steps" => form.guide_steps = value,
                "answer" => form.answer = value,
                "tags" => form.tags = value,
                "featured" => form.featured = parse_checkbox(&value),
                "remove_screenshots" => {
                    if let Some(reference) = non_blank(&value) {
                        submission.remove_screenshots.push(reference);
                    }
                }
                "remove_video" => submission.remove_video = parse_checkbox(&value),
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(submission)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
