//! Database models mapping to the blog schema.

use sqlx::FromRow;
use time::OffsetDateTime;

// =============================================================================
// Categories
// =============================================================================

/// Category record.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategoryRow {
    pub category_id: i64,
    pub category_title: Option<String>,
    pub category_image_name: Option<String>,
    pub category_publish_date: Option<OffsetDateTime>,
}

/// Fields for inserting a category; the id is generated by the store.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub category_title: Option<String>,
    pub category_image_name: Option<String>,
    pub category_publish_date: Option<OffsetDateTime>,
}

// =============================================================================
// Articles
// =============================================================================

/// Article record. Always belongs to a category.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ArticleRow {
    pub article_id: i64,
    pub article_title: Option<String>,
    pub article_ingress: Option<String>,
    pub article_image_name: Option<String>,
    pub article_publish_date: Option<OffsetDateTime>,
    pub created_by: Option<String>,
    pub sticky_article: bool,
    pub category_id: i64,
}

/// Fields for inserting an article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub article_title: Option<String>,
    pub article_ingress: Option<String>,
    pub article_image_name: Option<String>,
    pub article_publish_date: Option<OffsetDateTime>,
    pub created_by: Option<String>,
    pub sticky_article: bool,
    pub category_id: i64,
}

// =============================================================================
// Article paragraphs
// =============================================================================

/// Paragraph record. Always belongs to an article.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ArticleParagraphRow {
    pub article_paragraph_id: i64,
    pub article_paragraph_title: Option<String>,
    pub article_paragraph_image_name: Option<String>,
    pub content: Option<String>,
    pub article_id: i64,
}

/// Fields for inserting a paragraph.
#[derive(Debug, Clone)]
pub struct NewArticleParagraph {
    pub article_paragraph_title: Option<String>,
    pub article_paragraph_image_name: Option<String>,
    pub content: Option<String>,
    pub article_id: i64,
}
