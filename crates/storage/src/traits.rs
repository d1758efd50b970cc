//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Image store abstraction.
///
/// Stored names are flat: a single file name with no directory components.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Save an uploaded image and return the generated stored name.
    ///
    /// The name is derived from `original_name` (see
    /// [`blog_core::stored_image_name`]). An existing file with the same
    /// generated name is overwritten.
    async fn save(&self, original_name: &str, data: Bytes) -> StorageResult<String>;

    /// Delete an image by stored name. Missing images are not an error.
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// Directory the images live in (served under `/Images`).
    fn root(&self) -> &Path;

    /// Get the backend name for logging/metrics.
    fn backend_name(&self) -> &'static str;

    /// Check that the backing directory is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}
