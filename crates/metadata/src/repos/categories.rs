//! Category repository trait.

use crate::error::MetadataResult;
use crate::models::{CategoryRow, NewCategory};
use async_trait::async_trait;

/// Repository for categories.
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Insert a category and return the stored row with its generated id.
    async fn create_category(&self, category: &NewCategory) -> MetadataResult<CategoryRow>;

    /// Get a category by ID.
    async fn get_category(&self, category_id: i64) -> MetadataResult<Option<CategoryRow>>;

    /// List all categories in ascending id order.
    async fn list_categories(&self) -> MetadataResult<Vec<CategoryRow>>;

    /// List the `limit` most recent categories, newest first.
    async fn list_latest_categories(&self, limit: i64) -> MetadataResult<Vec<CategoryRow>>;

    /// Fetch the categories with the given ids in one query. Unknown ids are
    /// skipped.
    async fn list_categories_by_ids(
        &self,
        category_ids: &[i64],
    ) -> MetadataResult<Vec<CategoryRow>>;

    /// Overwrite every column of an existing category.
    ///
    /// Returns [`MetadataError::Concurrency`](crate::MetadataError::Concurrency)
    /// when no row matched.
    async fn update_category(&self, category: &CategoryRow) -> MetadataResult<()>;

    /// Delete a category. Fails with a constraint error while articles
    /// still reference it.
    async fn delete_category(&self, category_id: i64) -> MetadataResult<()>;

    /// Check whether a category exists.
    async fn category_exists(&self, category_id: i64) -> MetadataResult<bool>;
}
