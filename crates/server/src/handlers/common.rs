//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use crate::form::UploadedImage;
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use blog_metadata::{MetadataError, MetadataResult};
use serde::Serialize;
use std::future::Future;

/// Save an upload and return its stored name.
pub async fn save_image(state: &AppState, upload: UploadedImage) -> ApiResult<String> {
    let size = upload.data.len() as u64;
    let name = state.images.save(&upload.file_name, upload.data).await?;

    metrics::IMAGES_SAVED.inc();
    metrics::IMAGE_BYTES_SAVED.inc_by(size);
    tracing::debug!(image = %name, original = %upload.file_name, size, "Image saved");
    Ok(name)
}

/// Replace `previous` with a new upload. Errors deleting the old image abort
/// the update.
pub async fn replace_image(
    state: &AppState,
    previous: Option<&str>,
    upload: UploadedImage,
) -> ApiResult<String> {
    if let Some(previous) = previous {
        state.images.delete(previous).await?;
        metrics::IMAGES_DELETED.inc();
    }
    save_image(state, upload).await
}

/// Delete an image without failing the request.
pub async fn discard_image(state: &AppState, name: Option<&str>) {
    let Some(name) = name else {
        return;
    };
    match state.images.delete(name).await {
        Ok(()) => metrics::IMAGES_DELETED.inc(),
        Err(e) => {
            metrics::IMAGE_DELETE_FAILURES.inc();
            tracing::warn!(image = %name, error = %e, "Failed to delete image, continuing");
        }
    }
}

/// Turn the outcome of an `update_*` call into the handler result.
///
/// A row that vanished is a 404; a row that still exists but was not
/// updated is re-raised as an internal error.
pub async fn resolve_update<F, Fut>(
    result: MetadataResult<()>,
    entity: &'static str,
    id: i64,
    exists: F,
) -> ApiResult<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = MetadataResult<bool>>,
{
    match result {
        Ok(()) => {
            metrics::record_write(entity, "update");
            Ok(())
        }
        Err(MetadataError::Concurrency(msg)) => {
            metrics::UPDATE_CONFLICTS.with_label_values(&[entity]).inc();
            if exists().await? {
                tracing::error!(entity, id, "Update conflict on existing row");
                Err(MetadataError::Concurrency(msg).into())
            } else {
                Err(ApiError::NotFound(format!("{entity} {id} not found")))
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Reject an update whose form id does not match the path id.
pub fn ensure_same_id(entity: &str, path_id: i64, form_id: Option<i64>) -> ApiResult<()> {
    if form_id != Some(path_id) {
        return Err(ApiError::BadRequest(format!(
            "{entity} id in path ({path_id}) does not match form id ({})",
            form_id.map_or_else(|| "missing".to_string(), |id| id.to_string())
        )));
    }
    Ok(())
}

/// `201 Created` with a `Location` header and JSON body.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body)).into_response()
}
