//! Article kinds, field limits, and form normalization helpers.
//!
//! Lives in `core` so the repository, the catalog service and the templates
//! agree on one definition of what a well-formed article looks like.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::error::{CoreError, FieldErrors};

/// Entity name used in `CoreError::NotFound`.
pub const ENTITY_NAME: &str = "Article";

// ---------------------------------------------------------------------------
// Article kinds
// ---------------------------------------------------------------------------

/// What an article documents. Decides the docs section it is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    #[default]
    Error,
    Guide,
    Practice,
    Faq,
    News,
}

impl ArticleKind {
    pub const ALL: [ArticleKind; 5] = [
        ArticleKind::Error,
        ArticleKind::Guide,
        ArticleKind::Practice,
        ArticleKind::Faq,
        ArticleKind::News,
    ];

    /// Value stored in the `kind` column and used in `/docs/{kind}`.
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleKind::Error => "error",
            ArticleKind::Guide => "guide",
            ArticleKind::Practice => "practice",
            ArticleKind::Faq => "faq",
            ArticleKind::News => "news",
        }
    }

    /// Navigation label for the docs section.
    pub fn section_label(self) -> &'static str {
        match self {
            ArticleKind::Error => "Known errors",
            ArticleKind::Guide => "Guides",
            ArticleKind::Practice => "Best practices",
            ArticleKind::Faq => "FAQ",
            ArticleKind::News => "What's new",
        }
    }
}

impl fmt::Display for ArticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown article kind '{s}'. Must be one of: error, guide, practice, faq, news"
                ))
            })
    }
}

impl TryFrom<String> for ArticleKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, CoreError> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Form normalization
// ---------------------------------------------------------------------------

/// Split multi-line form text into an ordered list of entries.
///
/// Each line is trimmed, blank lines are dropped, order is preserved.
/// Handles both `\n` and `\r\n` line endings.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim a text field, mapping blank input to `None`.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Interpret an HTML checkbox value.
///
/// Browsers send `on` for a checked box without an explicit value and omit
/// the field entirely when unchecked.
pub fn parse_checkbox(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// `validator` rule: the value must contain at least one non-whitespace char.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field is required".into());
        return Err(err);
    }
    Ok(())
}

/// Flatten `validator` output into per-field messages.
///
/// Errors without an explicit message fall back to their code so nothing is
/// silently dropped.
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
