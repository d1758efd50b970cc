//! Article paragraph endpoints.

use super::common::{
    created, discard_image, ensure_same_id, replace_image, resolve_update, save_image,
};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::form::{FormFields, UploadedImage};
use crate::metrics;
use crate::projection::{self, ArticleParagraphView};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use blog_metadata::models::{ArticleParagraphRow, ArticleRow, NewArticleParagraph};
use std::collections::HashMap;

struct ParagraphForm {
    paragraph_id: Option<i64>,
    title: Option<String>,
    image_name: Option<String>,
    content: Option<String>,
    article_id: i64,
    image: Option<UploadedImage>,
}

impl ParagraphForm {
    async fn read(multipart: Multipart) -> ApiResult<Self> {
        let mut form = FormFields::read(multipart, "ArticleParagraphImageFile").await?;
        let article_id = form
            .id("ArticleId")?
            .ok_or_else(|| ApiError::BadRequest("ArticleId is required".to_string()))?;

        Ok(Self {
            paragraph_id: form.id("ArticleParagraphId")?,
            title: form.bounded_text("ArticleParagraphTitle")?,
            image_name: form.image_name("ArticleParagraphImageName")?,
            content: form.text("Content"),
            article_id,
            image: form.take_image(),
        })
    }
}

/// GET /api/ArticleParagraphs - every paragraph with its article.
pub async fn list_paragraphs(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<ArticleParagraphView>>> {
    let paragraphs = state.metadata.list_paragraphs().await?;
    let articles: HashMap<i64, ArticleRow> = state
        .metadata
        .list_articles()
        .await?
        .into_iter()
        .map(|a| (a.article_id, a))
        .collect();

    let views = paragraphs
        .into_iter()
        .map(|row| {
            let article = articles
                .get(&row.article_id)
                .cloned()
                .map(|a| projection::article(&ctx, a, None, Vec::new()));
            projection::paragraph(&ctx, row, article)
        })
        .collect();

    Ok(Json(views))
}

/// GET /api/ArticleParagraphs/{id}
pub async fn get_paragraph(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleParagraphView>> {
    let row = fetch_paragraph(&state, id).await?;
    Ok(Json(projection::paragraph(&ctx, row, None)))
}

/// GET /api/ArticleParagraphs/GetArticleParagraphDetails/{id} - paragraph
/// with its article.
pub async fn get_paragraph_details(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleParagraphView>> {
    let row = fetch_paragraph(&state, id).await?;
    let article = state
        .metadata
        .get_article(row.article_id)
        .await?
        .map(|a| projection::article(&ctx, a, None, Vec::new()));
    Ok(Json(projection::paragraph(&ctx, row, article)))
}

/// POST /api/ArticleParagraphs
pub async fn create_paragraph(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = ParagraphForm::read(multipart).await?;

    let image_name = match form.image {
        Some(upload) => Some(save_image(&state, upload).await?),
        None => form.image_name,
    };

    let row = state
        .metadata
        .create_paragraph(&NewArticleParagraph {
            article_paragraph_title: form.title,
            article_paragraph_image_name: image_name,
            content: form.content,
            article_id: form.article_id,
        })
        .await?;

    metrics::record_write("article_paragraph", "create");
    tracing::info!(
        article_paragraph_id = row.article_paragraph_id,
        article_id = row.article_id,
        "Article paragraph created"
    );

    let location = ctx.resource_url("ArticleParagraphs", row.article_paragraph_id);
    Ok(created(location, projection::paragraph(&ctx, row, None)))
}

/// PUT /api/ArticleParagraphs/{id}
pub async fn update_paragraph(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<StatusCode> {
    let form = ParagraphForm::read(multipart).await?;
    ensure_same_id("article paragraph", id, form.paragraph_id)?;

    let mut image_name = form.image_name;
    if let Some(upload) = form.image {
        image_name = Some(replace_image(&state, image_name.as_deref(), upload).await?);
    }

    let row = ArticleParagraphRow {
        article_paragraph_id: id,
        article_paragraph_title: form.title,
        article_paragraph_image_name: image_name,
        content: form.content,
        article_id: form.article_id,
    };
    let result = state.metadata.update_paragraph(&row).await;
    resolve_update(result, "article_paragraph", id, || {
        state.metadata.paragraph_exists(id)
    })
    .await?;

    tracing::info!(article_paragraph_id = id, "Article paragraph updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/ArticleParagraphs/{id}
pub async fn delete_paragraph(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let row = fetch_paragraph(&state, id).await?;

    discard_image(&state, row.article_paragraph_image_name.as_deref()).await;
    state.metadata.delete_paragraph(id).await?;

    metrics::record_write("article_paragraph", "delete");
    tracing::info!(article_paragraph_id = id, "Article paragraph deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_paragraph(state: &AppState, id: i64) -> ApiResult<ArticleParagraphRow> {
    state
        .metadata
        .get_paragraph(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("article paragraph {id} not found")))
}
