//! Application state shared across handlers.

use crate::url::PublicUrls;
use axum::http::HeaderMap;
use larder_core::config::AppConfig;
use larder_metadata::MetadataStore;
use larder_storage::BlobStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Blob storage for sandbox file bodies.
    pub storage: Arc<dyn BlobStore>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metadata,
        }
    }

    /// URL builder for a request.
    pub fn urls(&self, headers: &HeaderMap) -> PublicUrls {
        PublicUrls::for_request(&self.config.server, headers)
    }
}
