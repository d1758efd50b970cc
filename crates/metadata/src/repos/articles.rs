//! Article repository trait.

use crate::error::MetadataResult;
use crate::models::{ArticleRow, NewArticle};
use async_trait::async_trait;

/// Repository for articles.
#[async_trait]
pub trait ArticleRepo: Send + Sync {
    /// Insert an article. Fails with a constraint error when the category
    /// does not exist.
    async fn create_article(&self, article: &NewArticle) -> MetadataResult<ArticleRow>;

    /// Get an article by ID.
    async fn get_article(&self, article_id: i64) -> MetadataResult<Option<ArticleRow>>;

    /// List all articles in ascending id order.
    async fn list_articles(&self) -> MetadataResult<Vec<ArticleRow>>;

    /// List the `limit` most recent articles, newest first.
    async fn list_latest_articles(&self, limit: i64) -> MetadataResult<Vec<ArticleRow>>;

    /// List every article of a category, newest first.
    async fn list_articles_for_category(&self, category_id: i64)
    -> MetadataResult<Vec<ArticleRow>>;

    /// For each of the given categories, list at most `per_category` of its
    /// most recent articles, newest first within a category.
    async fn list_latest_articles_for_categories(
        &self,
        category_ids: &[i64],
        per_category: i64,
    ) -> MetadataResult<Vec<ArticleRow>>;

    /// Overwrite every column of an existing article.
    async fn update_article(&self, article: &ArticleRow) -> MetadataResult<()>;

    /// Delete an article. Fails with a constraint error while paragraphs
    /// still reference it.
    async fn delete_article(&self, article_id: i64) -> MetadataResult<()>;

    /// Check whether an article exists.
    async fn article_exists(&self, article_id: i64) -> MetadataResult<bool>;
}
