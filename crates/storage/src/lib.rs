//! Image storage for the blog API.
//!
//! This crate provides:
//! - The [`ImageStore`] trait used by the HTTP layer
//! - A local filesystem backend rooted at `<content_root>/Images`
//! - Generated, timestamped stored names for uploads

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemImageStore;
pub use error::{StorageError, StorageResult};
pub use traits::ImageStore;

use blog_core::config::ImageStoreConfig;
use std::sync::Arc;

/// Create an image store from configuration.
pub async fn from_config(config: &ImageStoreConfig) -> StorageResult<Arc<dyn ImageStore>> {
    let store = FilesystemImageStore::new(config.images_dir()).await?;
    Ok(Arc::new(store))
}
