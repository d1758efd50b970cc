//! Per-request context used to build absolute URLs.

use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;
use blog_core::IMAGES_DIR;
use blog_core::config::ServerConfig;
use std::convert::Infallible;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme, host, and base path of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: String,
    pub host: String,
    pub base_path: String,
}

impl RequestContext {
    /// Build the context from request parts.
    ///
    /// Forwarded headers are only honoured when
    /// `server.trust_forwarded_headers` is set, and then take precedence.
    pub fn from_parts(parts: &Parts, server: &ServerConfig) -> Self {
        let forwarded = |name: &str| {
            if !server.trust_forwarded_headers {
                return None;
            }
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let scheme = forwarded(X_FORWARDED_PROTO)
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let host = forwarded(X_FORWARDED_HOST)
            .or_else(|| {
                parts
                    .headers
                    .get(HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            scheme,
            host,
            base_path: server.path_base.clone(),
        }
    }

    /// `<scheme>://<host><base_path>`
    pub fn origin(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.base_path)
    }

    /// Public URL of a stored image, or `None` when there is no image.
    pub fn image_src(&self, image_name: Option<&str>) -> Option<String> {
        image_name
            .filter(|name| !name.is_empty())
            .map(|name| format!("{}/{IMAGES_DIR}/{name}", self.origin()))
    }

    /// Location of a single resource, e.g. `.../api/Categories/7`.
    pub fn resource_url(&self, collection: &str, id: i64) -> String {
        format!("{}/api/{collection}/{id}", self.origin())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, &state.config.server))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn host_header_and_default_scheme() {
        let parts = parts(
            Request::builder()
                .uri("/api/Categories")
                .header("host", "blog.example:8080")
                .body(())
                .unwrap(),
        );
        let ctx = RequestContext::from_parts(&parts, &ServerConfig::default());

        assert_eq!(ctx.scheme, "http");
        assert_eq!(ctx.host, "blog.example:8080");
        assert_eq!(
            ctx.image_src(Some("cat214207123.png")).as_deref(),
            Some("http://blog.example:8080/Images/cat214207123.png")
        );
        assert_eq!(ctx.image_src(None), None);
    }

    #[test]
    fn forwarded_headers_ignored_unless_trusted() {
        let request = || {
            Request::builder()
                .uri("/api/Articles")
                .header("host", "internal:8080")
                .header("x-forwarded-proto", "https, http")
                .header("x-forwarded-host", "blog.example")
                .body(())
                .unwrap()
        };

        let untrusted = RequestContext::from_parts(&parts(request()), &ServerConfig::default());
        assert_eq!(untrusted.origin(), "http://internal:8080");

        let server = ServerConfig {
            trust_forwarded_headers: true,
            path_base: "/blog".to_string(),
            ..Default::default()
        };
        let trusted = RequestContext::from_parts(&parts(request()), &server);
        assert_eq!(trusted.origin(), "https://blog.example/blog");
        assert_eq!(
            trusted.resource_url("Articles", 3),
            "https://blog.example/blog/api/Articles/3"
        );
    }

    #[test]
    fn absolute_uri_supplies_scheme_and_host() {
        let parts = parts(
            Request::builder()
                .uri("https://cdn.example/api/Categories")
                .body(())
                .unwrap(),
        );
        let ctx = RequestContext::from_parts(&parts, &ServerConfig::default());
        assert_eq!(ctx.origin(), "https://cdn.example");
    }

    #[test]
    fn missing_host_falls_back_to_localhost() {
        let parts = parts(Request::builder().uri("/health").body(()).unwrap());
        let ctx = RequestContext::from_parts(&parts, &ServerConfig::default());
        assert_eq!(ctx.host, "localhost");
    }
}
