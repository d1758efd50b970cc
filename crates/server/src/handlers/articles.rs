//! Article endpoints.

use super::common::{
    created, discard_image, ensure_same_id, replace_image, resolve_update, save_image,
};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::form::{FormFields, UploadedImage};
use crate::metrics;
use crate::projection::{self, ArticleParagraphView, ArticleView};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use blog_metadata::models::{ArticleRow, CategoryRow, NewArticle};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Number of articles returned by `GetLastArticles`.
const LAST_ARTICLES: i64 = 3;

struct ArticleForm {
    article_id: Option<i64>,
    title: Option<String>,
    ingress: Option<String>,
    image_name: Option<String>,
    publish_date: Option<OffsetDateTime>,
    created_by: Option<String>,
    sticky: bool,
    category_id: i64,
    image: Option<UploadedImage>,
}

impl ArticleForm {
    async fn read(multipart: Multipart) -> ApiResult<Self> {
        let mut form = FormFields::read(multipart, "ArticleImageFile").await?;
        let category_id = form
            .id("CategoryId")?
            .ok_or_else(|| ApiError::BadRequest("CategoryId is required".to_string()))?;

        Ok(Self {
            article_id: form.id("ArticleId")?,
            title: form.bounded_text("ArticleTitle")?,
            ingress: form.bounded_text("ArticleIngress")?,
            image_name: form.image_name("ArticleImageName")?,
            publish_date: form.date("ArticlePublishDate")?,
            created_by: form.bounded_text("CreatedBy")?,
            sticky: form.flag("StickyArticle")?,
            category_id,
            image: form.take_image(),
        })
    }
}

/// GET /api/Articles - every article with its category and paragraphs.
pub async fn list_articles(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<ArticleView>>> {
    let articles = state.metadata.list_articles().await?;

    let categories: HashMap<i64, CategoryRow> = state
        .metadata
        .list_categories()
        .await?
        .into_iter()
        .map(|c| (c.category_id, c))
        .collect();

    let mut paragraphs: HashMap<i64, Vec<ArticleParagraphView>> = HashMap::new();
    for row in state.metadata.list_paragraphs().await? {
        paragraphs
            .entry(row.article_id)
            .or_default()
            .push(projection::paragraph(&ctx, row, None));
    }

    let views = articles
        .into_iter()
        .map(|row| {
            let category = categories
                .get(&row.category_id)
                .cloned()
                .map(|c| projection::category(&ctx, c, Vec::new()));
            let own = paragraphs.remove(&row.article_id).unwrap_or_default();
            projection::article(&ctx, row, category, own)
        })
        .collect();

    Ok(Json(views))
}

/// GET /api/Articles/{id} - article with its category.
pub async fn get_article(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleView>> {
    let row = fetch_article(&state, id).await?;
    Ok(Json(with_category(&state, &ctx, row).await?))
}

/// GET /api/Articles/GetArticleDetails/{id} - article with its category.
/// Paragraphs are fetched separately by clients.
pub async fn get_article_details(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleView>> {
    let row = fetch_article(&state, id).await?;
    Ok(Json(with_category(&state, &ctx, row).await?))
}

/// GET /api/Articles/GetLastArticles - newest articles with their category.
pub async fn get_last_articles(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<ArticleView>>> {
    let rows = state.metadata.list_latest_articles(LAST_ARTICLES).await?;

    let mut category_ids: Vec<i64> = rows.iter().map(|row| row.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();
    let categories: HashMap<i64, CategoryRow> = state
        .metadata
        .list_categories_by_ids(&category_ids)
        .await?
        .into_iter()
        .map(|c| (c.category_id, c))
        .collect();

    let views = rows
        .into_iter()
        .map(|row| {
            let category = categories
                .get(&row.category_id)
                .cloned()
                .map(|c| projection::category(&ctx, c, Vec::new()));
            projection::article(&ctx, row, category, Vec::new())
        })
        .collect();

    Ok(Json(views))
}

/// POST /api/Articles
///
/// An unknown `CategoryId` is rejected by the foreign key (409).
pub async fn create_article(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = ArticleForm::read(multipart).await?;

    let image_name = match form.image {
        Some(upload) => Some(save_image(&state, upload).await?),
        None => form.image_name,
    };

    let row = state
        .metadata
        .create_article(&NewArticle {
            article_title: form.title,
            article_ingress: form.ingress,
            article_image_name: image_name,
            article_publish_date: form.publish_date,
            created_by: form.created_by,
            sticky_article: form.sticky,
            category_id: form.category_id,
        })
        .await?;

    metrics::record_write("article", "create");
    tracing::info!(
        article_id = row.article_id,
        category_id = row.category_id,
        "Article created"
    );

    let location = ctx.resource_url("Articles", row.article_id);
    Ok(created(
        location,
        projection::article(&ctx, row, None, Vec::new()),
    ))
}

/// PUT /api/Articles/{id}
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<StatusCode> {
    let form = ArticleForm::read(multipart).await?;
    ensure_same_id("article", id, form.article_id)?;

    let mut image_name = form.image_name;
    if let Some(upload) = form.image {
        image_name = Some(replace_image(&state, image_name.as_deref(), upload).await?);
    }

    let row = ArticleRow {
        article_id: id,
        article_title: form.title,
        article_ingress: form.ingress,
        article_image_name: image_name,
        article_publish_date: form.publish_date,
        created_by: form.created_by,
        sticky_article: form.sticky,
        category_id: form.category_id,
    };
    let result = state.metadata.update_article(&row).await;
    resolve_update(result, "article", id, || state.metadata.article_exists(id)).await?;

    tracing::info!(article_id = id, "Article updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/Articles/{id}
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let row = fetch_article(&state, id).await?;

    discard_image(&state, row.article_image_name.as_deref()).await;
    state.metadata.delete_article(id).await?;

    metrics::record_write("article", "delete");
    tracing::info!(article_id = id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_article(state: &AppState, id: i64) -> ApiResult<ArticleRow> {
    state
        .metadata
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))
}

async fn with_category(
    state: &AppState,
    ctx: &RequestContext,
    row: ArticleRow,
) -> ApiResult<ArticleView> {
    let category = state
        .metadata
        .get_category(row.category_id)
        .await?
        .map(|c| projection::category(ctx, c, Vec::new()));
    Ok(projection::article(ctx, row, category, Vec::new()))
}
