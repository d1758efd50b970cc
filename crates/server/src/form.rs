//! Multipart form decoding shared by the entity handlers.

use crate::error::{ApiError, ApiResult};
use axum::extract::Multipart;
use blog_core::{
    MAX_TEXT_LEN, parse_flag, parse_publish_date, validate_max_len, validate_stored_name,
};
use bytes::Bytes;
use std::collections::HashMap;
use time::OffsetDateTime;

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Bytes,
}

/// Decoded multipart form. Field names are matched case-insensitively.
#[derive(Debug, Default)]
pub struct FormFields {
    values: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl FormFields {
    /// Drain a multipart body. The part named `image_field` is kept as the
    /// upload; every other part is read as text.
    pub async fn read(mut multipart: Multipart, image_field: &str) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("multipart error: {e}")))?
        {
            let Some(name) = field.name().map(|n| n.to_ascii_lowercase()) else {
                continue;
            };

            if name.eq_ignore_ascii_case(image_field) {
                let file_name = field.file_name().map(str::to_string).unwrap_or_default();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("read error: {e}")))?;
                // An empty file part means "no upload".
                if !file_name.is_empty() && !data.is_empty() {
                    form.image = Some(UploadedImage { file_name, data });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("read error: {e}")))?;
                form.values.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Build a form from already-decoded values.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        image: Option<UploadedImage>,
    ) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            image,
        }
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Free text. Empty strings are treated as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.value(name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Text limited to the schema's column width.
    pub fn bounded_text(&self, name: &'static str) -> ApiResult<Option<String>> {
        let value = self.text(name);
        validate_max_len(name, value.as_deref(), MAX_TEXT_LEN)?;
        Ok(value)
    }

    /// Name of an image already in the store. Must be a plain file name.
    pub fn image_name(&self, name: &'static str) -> ApiResult<Option<String>> {
        let value = self.bounded_text(name)?;
        if let Some(stored) = &value {
            validate_stored_name(stored)?;
        }
        Ok(value)
    }

    /// Integer id. Absent or blank yields `None`.
    pub fn id(&self, name: &str) -> ApiResult<Option<i64>> {
        match self.value(name).map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => v
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("{name} must be an integer: {v}"))),
        }
    }

    pub fn date(&self, name: &'static str) -> ApiResult<Option<OffsetDateTime>> {
        match self.value(name).map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => Ok(Some(parse_publish_date(name, v)?)),
        }
    }

    /// Boolean flag; absent means `false`.
    pub fn flag(&self, name: &'static str) -> ApiResult<bool> {
        match self.value(name) {
            None => Ok(false),
            Some(v) => Ok(parse_flag(name, v)?),
        }
    }

    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }
}
