//! Article paragraph repository trait.

use crate::error::MetadataResult;
use crate::models::{ArticleParagraphRow, NewArticleParagraph};
use async_trait::async_trait;

/// Repository for article paragraphs.
#[async_trait]
pub trait ArticleParagraphRepo: Send + Sync {
    /// Insert a paragraph. Fails with a constraint error when the article
    /// does not exist.
    async fn create_paragraph(
        &self,
        paragraph: &NewArticleParagraph,
    ) -> MetadataResult<ArticleParagraphRow>;

    /// Get a paragraph by ID.
    async fn get_paragraph(
        &self,
        paragraph_id: i64,
    ) -> MetadataResult<Option<ArticleParagraphRow>>;

    /// List all paragraphs in ascending id order.
    async fn list_paragraphs(&self) -> MetadataResult<Vec<ArticleParagraphRow>>;

    /// Overwrite every column of an existing paragraph.
    async fn update_paragraph(&self, paragraph: &ArticleParagraphRow) -> MetadataResult<()>;

    /// Delete a paragraph.
    async fn delete_paragraph(&self, paragraph_id: i64) -> MetadataResult<()>;

    /// Check whether a paragraph exists.
    async fn paragraph_exists(&self, paragraph_id: i64) -> MetadataResult<bool>;
}
