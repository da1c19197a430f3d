//! HTML rendering with Tera.
//!
//! Templates are embedded at compile time and parsed once into a shared
//! engine. Every page gets the docs-section navigation injected, so page
//! contexts only carry their own data.

use std::sync::LazyLock;

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use helpcenter_core::article::ArticleKind;

use crate::error::{AppError, AppResult};

/// `(name, source)` pairs for every template the application renders.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("errors.html", include_str!("../templates/errors.html")),
    ("error_detail.html", include_str!("../templates/error_detail.html")),
    ("categories.html", include_str!("../templates/categories.html")),
    ("docs.html", include_str!("../templates/docs.html")),
    ("admin.html", include_str!("../templates/admin.html")),
    ("admin_edit.html", include_str!("../templates/admin_edit.html")),
    ("error.html", include_str!("../templates/error.html")),
    (
        "partials/article_card.html",
        include_str!("../templates/partials/article_card.html"),
    ),
    (
        "partials/article_form.html",
        include_str!("../templates/partials/article_form.html"),
    ),
    (
        "partials/chatbot.html",
        include_str!("../templates/partials/chatbot.html"),
    ),
    (
        "partials/search_box.html",
        include_str!("../templates/partials/search_box.html"),
    ),
];

static ENGINE: LazyLock<Result<Tera, String>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())
        .map_err(|e| format!("{e:?}"))?;
    Ok(tera)
});

/// The shared template engine.
///
/// Fails only if an embedded template does not parse; the binary calls this
/// at startup so that surfaces before the first request.
pub fn engine() -> AppResult<&'static Tera> {
    ENGINE
        .as_ref()
        .map_err(|e| AppError::InternalError(format!("Template engine failed to load: {e}")))
}

/// A docs section link in the navigation bar.
#[derive(Debug, Serialize)]
struct Section {
    kind: ArticleKind,
    label: &'static str,
}

fn sections() -> Vec<Section> {
    ArticleKind::ALL
        .into_iter()
        .map(|kind| Section {
            kind,
            label: kind.section_label(),
        })
        .collect()
}

/// Render `name` with `page` as its context.
///
/// `page` must serialize to a map.
pub fn render(name: &str, page: &impl Serialize) -> AppResult<Html<String>> {
    let mut context = Context::from_serialize(page)?;
    context.insert("sections", &sections());
    let html = engine()?.render(name, &context)?;
    Ok(Html(html))
}
