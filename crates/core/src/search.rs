//! Keyword search helpers.
//!
//! Matching is a plain case-insensitive substring test (`ILIKE`), with no
//! ranking. These helpers normalize user input before it reaches SQL.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Number of matches shown in the chatbot preview widget.
pub const CHATBOT_PREVIEW_LIMIT: i64 = 5;

/// Default page size for the JSON listing.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size for the JSON listing.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

// ---------------------------------------------------------------------------
// Query normalization
// ---------------------------------------------------------------------------

/// Trim an optional query-string value; blank input means "no filter".
pub fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build an `ILIKE` pattern matching `query` anywhere in a column.
///
/// `%`, `_` and `\` are escaped so they match literally under PostgreSQL's
/// default `\` escape character.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
