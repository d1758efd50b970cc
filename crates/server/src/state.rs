//! Application state shared across handlers.

use blog_core::config::AppConfig;
use blog_metadata::MetadataStore;
use blog_storage::ImageStore;
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Relational store for categories, articles, and paragraphs.
    pub metadata: Arc<dyn MetadataStore>,
    /// Uploaded image files.
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            images,
        }
    }
}
