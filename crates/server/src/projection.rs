//! Response payloads and the row-to-payload projection.
//!
//! Image URLs are never stored. They are derived from the request context
//! each time a row is returned.

use crate::context::RequestContext;
use blog_metadata::models::{ArticleParagraphRow, ArticleRow, CategoryRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Category as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category_id: i64,
    pub category_title: Option<String>,
    pub category_image_name: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub category_publish_date: Option<OffsetDateTime>,
    pub category_image_src: Option<String>,
    pub articles: Vec<ArticleView>,
}

/// Article as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub article_id: i64,
    pub article_title: Option<String>,
    pub article_ingress: Option<String>,
    pub article_image_name: Option<String>,
    pub article_image_src: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub article_publish_date: Option<OffsetDateTime>,
    pub created_by: Option<String>,
    pub sticky_article: bool,
    pub category_id: i64,
    pub category: Option<Box<CategoryView>>,
    pub article_paragraphs: Vec<ArticleParagraphView>,
}

/// Article paragraph as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleParagraphView {
    pub article_paragraph_id: i64,
    pub article_paragraph_title: Option<String>,
    pub article_paragraph_image_name: Option<String>,
    pub content: Option<String>,
    pub article_id: i64,
    pub article_paragraph_image_src: Option<String>,
    pub article: Option<Box<ArticleView>>,
}

pub fn category(
    ctx: &RequestContext,
    row: CategoryRow,
    articles: Vec<ArticleView>,
) -> CategoryView {
    CategoryView {
        category_image_src: ctx.image_src(row.category_image_name.as_deref()),
        category_id: row.category_id,
        category_title: row.category_title,
        category_image_name: row.category_image_name,
        category_publish_date: row.category_publish_date,
        articles,
    }
}

pub fn article(
    ctx: &RequestContext,
    row: ArticleRow,
    category: Option<CategoryView>,
    paragraphs: Vec<ArticleParagraphView>,
) -> ArticleView {
    ArticleView {
        article_image_src: ctx.image_src(row.article_image_name.as_deref()),
        article_id: row.article_id,
        article_title: row.article_title,
        article_ingress: row.article_ingress,
        article_image_name: row.article_image_name,
        article_publish_date: row.article_publish_date,
        created_by: row.created_by,
        sticky_article: row.sticky_article,
        category_id: row.category_id,
        category: category.map(Box::new),
        article_paragraphs: paragraphs,
    }
}

pub fn paragraph(
    ctx: &RequestContext,
    row: ArticleParagraphRow,
    article: Option<ArticleView>,
) -> ArticleParagraphView {
    ArticleParagraphView {
        article_paragraph_image_src: ctx.image_src(row.article_paragraph_image_name.as_deref()),
        article_paragraph_id: row.article_paragraph_id,
        article_paragraph_title: row.article_paragraph_title,
        article_paragraph_image_name: row.article_paragraph_image_name,
        content: row.content,
        article_id: row.article_id,
        article: article.map(Box::new),
    }
}

/// Project categories, attaching each one's articles from `articles`.
///
/// Articles keep the order they arrive in.
pub fn categories_with_articles(
    ctx: &RequestContext,
    categories: Vec<CategoryRow>,
    articles: Vec<ArticleRow>,
) -> Vec<CategoryView> {
    let mut by_category: HashMap<i64, Vec<ArticleView>> = HashMap::new();
    for row in articles {
        by_category
            .entry(row.category_id)
            .or_default()
            .push(article(ctx, row, None, Vec::new()));
    }

    categories
        .into_iter()
        .map(|row| {
            let articles = by_category.remove(&row.category_id).unwrap_or_default();
            category(ctx, row, articles)
        })
        .collect()
}
