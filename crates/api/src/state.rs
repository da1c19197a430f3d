use std::sync::Arc;

use helpcenter_core::media::{MediaStorage, UploadPolicy};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Connections are checked out per query.
    pub pool: helpcenter_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend holding uploaded screenshots and videos.
    pub media: Arc<dyn MediaStorage>,
}

impl AppState {
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.config.upload_policy
    }
}
