//! Server test utilities.

use blog_core::config::AppConfig;
use blog_metadata::{MetadataStore, SqliteStore};
use blog_server::{AppState, create_router};
use blog_storage::{FilesystemImageStore, ImageStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with default configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server, letting the caller adjust the configuration.
    pub async fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let mut config = AppConfig::for_testing(temp_dir.path());
        configure(&mut config);

        let images: Arc<dyn ImageStore> = Arc::new(
            FilesystemImageStore::new(config.images.images_dir())
                .await
                .expect("Failed to create image store"),
        );

        let db_path = temp_dir.path().join("blog.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create metadata store"),
        );

        blog_server::metrics::register_metrics();

        let state = AppState::new(config, metadata, images);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get the metadata store.
    pub fn metadata(&self) -> &Arc<dyn MetadataStore> {
        &self.state.metadata
    }

    /// Directory holding uploaded images.
    pub fn images_dir(&self) -> PathBuf {
        self.state.images.root().to_path_buf()
    }

    /// Names of the files currently in the image directory.
    pub fn image_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.images_dir())
            .expect("Failed to read image directory")
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}
