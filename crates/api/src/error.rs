use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use helpcenter_core::error::{CoreError, FieldErrors};
use helpcenter_core::media::MediaError;

use crate::views;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds infrastructure and
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses; page handlers wrap it in [`PageError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `helpcenter_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A media storage failure.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// A template rendering failure.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A request body over the configured size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// How an error is presented to the client.
#[derive(Debug)]
pub struct Classified {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl AppError {
    /// Map the error to a status, error code and client-safe message.
    ///
    /// Infrastructure failures are logged here and their details withheld
    /// from the client.
    pub fn classify(&self) -> Classified {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => Classified::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    Classified::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::FieldValidation(fields) => Classified {
                    fields: Some(fields.clone()),
                    ..Classified::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "VALIDATION_ERROR",
                        core.to_string(),
                    )
                },
                CoreError::Conflict(msg) => {
                    Classified::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    Classified::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Media errors ---
            AppError::Media(MediaError::InvalidReference(reference)) => Classified::new(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("Invalid media reference: {reference}"),
            ),
            AppError::Media(err) => {
                tracing::error!(error = %err, "Media storage error");
                Classified::internal()
            }

            AppError::Template(err) => {
                tracing::error!(error = ?err, "Template rendering error");
                Classified::internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::PayloadTooLarge(msg) => Classified::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = self.classify();

        let mut body = json!({
            "error": classified.message,
            "code": classified.code,
        });
        if let Some(fields) = classified.fields {
            body["fields"] = json!(fields);
        }

        (classified.status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Check constraint violations (`23514`) map to 400.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    return Classified::new(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return Classified::new(
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            Classified::internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal()
        }
    }
}

// ---------------------------------------------------------------------------
// HTML error pages
// ---------------------------------------------------------------------------

/// Error type for handlers that render HTML pages.
///
/// Classified exactly like [`AppError`], but rendered through the
/// `error.html` template so browsers get a readable page.
#[derive(Debug)]
pub struct PageError(pub AppError);

/// Convenience type alias for page handler return values.
pub type PageResult<T> = Result<T, PageError>;

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

macro_rules! page_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PageError {
                fn from(err: $ty) -> Self {
                    PageError(AppError::from(err))
                }
            }
        )*
    };
}

page_error_from!(CoreError, sqlx::Error, MediaError, tera::Error);

#[derive(Serialize)]
struct ErrorPage<'a> {
    status: u16,
    title: &'a str,
    message: &'a str,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let classified = self.0.classify();
        let title = match classified.status {
            StatusCode::NOT_FOUND => "Not found",
            StatusCode::PAYLOAD_TOO_LARGE => "Upload too large",
            s if s.is_client_error() => "Invalid request",
            _ => "Something went wrong",
        };
        let page = ErrorPage {
            status: classified.status.as_u16(),
            title,
            message: &classified.message,
        };

        match views::render("error.html", &page) {
            Ok(html) => (classified.status, html).into_response(),
            Err(err) => {
                tracing::error!(error = ?err, "Failed to render error page");
                (classified.status, Html(format!("<h1>{title}</h1>"))).into_response()
            }
        }
    }
}
