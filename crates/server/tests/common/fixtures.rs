//! Request builders and canned data.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "blog-test-boundary";

/// A 1x1 transparent PNG.
#[allow(dead_code)]
pub fn tiny_png() -> Bytes {
    Bytes::from_static(&[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ])
}

/// Builder for `multipart/form-data` bodies.
#[derive(Default)]
#[allow(dead_code)]
pub struct MultipartForm {
    body: Vec<u8>,
}

#[allow(dead_code)]
impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text part.
    pub fn text(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{}\r\n",
                value.as_ref()
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file part.
    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A buffered response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
impl TestResponse {
    /// Body parsed as JSON, or `Null` when empty or not JSON.
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        }
    }

    /// Value of the `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Send `request` through the router and buffer the response.
#[allow(dead_code)]
pub async fn send(router: &axum::Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Send a body-less request with `Host: blog.test`.
#[allow(dead_code)]
pub async fn request(router: &axum::Router, method: &str, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Host", "blog.test")
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

/// Send a multipart form with `Host: blog.test`.
#[allow(dead_code)]
pub async fn form_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    form: MultipartForm,
) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Host", "blog.test")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    send(router, request).await
}

/// Create a category through the API and return its id.
#[allow(dead_code)]
pub async fn create_category(router: &axum::Router, title: &str) -> i64 {
    let response = form_request(
        router,
        "POST",
        "/api/Categories",
        MultipartForm::new().text("CategoryTitle", title),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.json()["categoryId"].as_i64().unwrap()
}

/// Create an article through the API and return its id.
#[allow(dead_code)]
pub async fn create_article(router: &axum::Router, category_id: i64, title: &str) -> i64 {
    let response = form_request(
        router,
        "POST",
        "/api/Articles",
        MultipartForm::new()
            .text("ArticleTitle", title)
            .text("CategoryId", category_id.to_string()),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.json()["articleId"].as_i64().unwrap()
}

/// Create a paragraph through the API and return its id.
#[allow(dead_code)]
pub async fn create_paragraph(router: &axum::Router, article_id: i64, content: &str) -> i64 {
    let response = form_request(
        router,
        "POST",
        "/api/ArticleParagraphs",
        MultipartForm::new()
            .text("Content", content)
            .text("ArticleId", article_id.to_string()),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.json()["articleParagraphId"].as_i64().unwrap()
}
