//! Local filesystem image store.

use crate::error::{StorageError, StorageResult};
use crate::traits::ImageStore;
use async_trait::async_trait;
use blog_core::{stored_image_name, validate_stored_name};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Image store backed by a single flat directory.
pub struct FilesystemImageStore {
    root: PathBuf,
}

impl FilesystemImageStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Save `data` under the name generated from `original_name` at `now`.
    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    pub async fn save_at(
        &self,
        original_name: &str,
        data: Bytes,
        now: OffsetDateTime,
    ) -> StorageResult<String> {
        let name = stored_image_name(original_name, now)?;
        let path = self.image_path(&name).await?;

        // Temp file in the same directory so the rename stays atomic.
        let temp_path = self.root.join(format!(".{name}.tmp.{}", Uuid::new_v4()));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        Ok(name)
    }

    /// Resolve a stored name to its path, rejecting anything that is not a
    /// plain file name inside the root.
    ///
    /// Runs on the blocking pool since it stats and canonicalizes.
    async fn image_path(&self, name: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || Self::image_path_sync(&root, &name))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    fn image_path_sync(root: &Path, name: &str) -> StorageResult<PathBuf> {
        validate_stored_name(name).map_err(|_| StorageError::InvalidName(name.to_string()))?;

        let mut components = Path::new(name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let path = root.join(name);

        // An existing entry may be a symlink pointing out of the root.
        match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let root_canonical = root.canonicalize()?;
                let resolved = path
                    .canonicalize()
                    .map_err(|_| StorageError::InvalidName(name.to_string()))?;
                if !resolved.starts_with(&root_canonical) {
                    return Err(StorageError::InvalidName(format!(
                        "resolved path escapes image root: {name}"
                    )));
                }
            }
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(StorageError::Io(err)),
        }

        Ok(path)
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn save(&self, original_name: &str, data: Bytes) -> StorageResult<String> {
        self.save_at(original_name, data, OffsetDateTime::now_utc())
            .await
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.image_path(name).await?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(name, "image already absent");
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("image root not accessible: {e}"),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("image root is not a directory: {:?}", self.root),
            )));
        }

        Ok(())
    }
}
