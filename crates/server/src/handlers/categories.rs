//! Category endpoints.

use super::common::{
    created, discard_image, ensure_same_id, replace_image, resolve_update, save_image,
};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::form::{FormFields, UploadedImage};
use crate::metrics;
use crate::projection::{self, CategoryView};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use blog_metadata::models::{CategoryRow, NewCategory};
use time::OffsetDateTime;

/// Number of categories returned by `GetLastCategories`.
const LAST_CATEGORIES: i64 = 4;
/// Articles attached to each of those categories.
const LAST_CATEGORY_ARTICLES: i64 = 3;

/// Decoded category form.
struct CategoryForm {
    category_id: Option<i64>,
    title: Option<String>,
    image_name: Option<String>,
    publish_date: Option<OffsetDateTime>,
    image: Option<UploadedImage>,
}

impl CategoryForm {
    async fn read(multipart: Multipart) -> ApiResult<Self> {
        let mut form = FormFields::read(multipart, "CategoryImageFile").await?;
        Ok(Self {
            category_id: form.id("CategoryId")?,
            title: form.bounded_text("CategoryTitle")?,
            image_name: form.image_name("CategoryImageName")?,
            publish_date: form.date("CategoryPublishDate")?,
            image: form.take_image(),
        })
    }
}

/// GET /api/Categories - every category with its articles.
pub async fn list_categories(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<CategoryView>>> {
    let categories = state.metadata.list_categories().await?;
    let articles = state.metadata.list_articles().await?;
    Ok(Json(projection::categories_with_articles(
        &ctx, categories, articles,
    )))
}

/// GET /api/Categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<CategoryView>> {
    let row = fetch_category(&state, id).await?;
    Ok(Json(projection::category(&ctx, row, Vec::new())))
}

/// GET /api/Categories/GetCategoryDetails/{id} - category with all its articles.
pub async fn get_category_details(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<CategoryView>> {
    let row = fetch_category(&state, id).await?;
    let articles = state
        .metadata
        .list_articles_for_category(id)
        .await?
        .into_iter()
        .map(|a| projection::article(&ctx, a, None, Vec::new()))
        .collect();
    Ok(Json(projection::category(&ctx, row, articles)))
}

/// GET /api/Categories/GetLastCategories - newest categories, each with
/// its newest articles.
pub async fn get_last_categories(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Vec<CategoryView>>> {
    let categories = state
        .metadata
        .list_latest_categories(LAST_CATEGORIES)
        .await?;
    let ids: Vec<i64> = categories.iter().map(|c| c.category_id).collect();
    let articles = state
        .metadata
        .list_latest_articles_for_categories(&ids, LAST_CATEGORY_ARTICLES)
        .await?;
    Ok(Json(projection::categories_with_articles(
        &ctx, categories, articles,
    )))
}

/// POST /api/Categories
pub async fn create_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = CategoryForm::read(multipart).await?;

    let image_name = match form.image {
        Some(upload) => Some(save_image(&state, upload).await?),
        None => form.image_name,
    };

    let row = state
        .metadata
        .create_category(&NewCategory {
            category_title: form.title,
            category_image_name: image_name,
            category_publish_date: form.publish_date,
        })
        .await?;

    metrics::record_write("category", "create");
    tracing::info!(category_id = row.category_id, "Category created");

    let location = ctx.resource_url("Categories", row.category_id);
    Ok(created(location, projection::category(&ctx, row, Vec::new())))
}

/// PUT /api/Categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<StatusCode> {
    let form = CategoryForm::read(multipart).await?;
    ensure_same_id("category", id, form.category_id)?;

    let mut image_name = form.image_name;
    if let Some(upload) = form.image {
        image_name = Some(replace_image(&state, image_name.as_deref(), upload).await?);
    }

    let row = CategoryRow {
        category_id: id,
        category_title: form.title,
        category_image_name: image_name,
        category_publish_date: form.publish_date,
    };
    let result = state.metadata.update_category(&row).await;
    resolve_update(result, "category", id, || state.metadata.category_exists(id)).await?;

    tracing::info!(category_id = id, "Category updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/Categories/{id}
///
/// Rejected with 409 while articles still reference the category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let row = fetch_category(&state, id).await?;

    discard_image(&state, row.category_image_name.as_deref()).await;
    state.metadata.delete_category(id).await?;

    metrics::record_write("category", "delete");
    tracing::info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_category(state: &AppState, id: i64) -> ApiResult<CategoryRow> {
    state
        .metadata
        .get_category(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("category {id} not found")))
}
