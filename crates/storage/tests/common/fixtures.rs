//! Shared fixtures for image store tests.

use blog_storage::FilesystemImageStore;
use bytes::Bytes;
use std::sync::Arc;
use tempfile::TempDir;

/// Smallest well-formed PNG header plus a few payload bytes.
pub fn tiny_png() -> Bytes {
    Bytes::from_static(&[
        0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
    ])
}

/// Filesystem image store in a temporary directory.
pub struct TestImages {
    pub store: Arc<FilesystemImageStore>,
    pub dir: TempDir,
}

impl TestImages {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = FilesystemImageStore::new(dir.path().join("Images"))
            .await
            .unwrap();
        Self {
            store: Arc::new(store),
            dir,
        }
    }
}
