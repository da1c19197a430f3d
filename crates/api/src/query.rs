//! Shared query parameter types.

use serde::Deserialize;

use helpcenter_core::search::normalize_filter;

/// `?q=&category=` as sent by the search box and category links.
///
/// Blank values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl SearchParams {
    pub fn query(&self) -> Option<String> {
        normalize_filter(self.q.as_deref())
    }

    pub fn category(&self) -> Option<String> {
        normalize_filter(self.category.as_deref())
    }
}

/// Query parameters for the JSON article listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub kind: Option<String>,
    pub limit: Option<i64>,
}
