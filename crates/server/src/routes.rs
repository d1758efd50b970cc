//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use blog_core::IMAGES_DIR;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// When `server.path_base` is set, every route (including `/Images`) is
/// served under it.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Categories
        .route(
            "/api/Categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/Categories/GetLastCategories",
            get(handlers::get_last_categories),
        )
        .route(
            "/api/Categories/GetCategoryDetails/{id}",
            get(handlers::get_category_details),
        )
        .route(
            "/api/Categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        // Articles
        .route(
            "/api/Articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/api/Articles/GetLastArticles",
            get(handlers::get_last_articles),
        )
        .route(
            "/api/Articles/GetArticleDetails/{id}",
            get(handlers::get_article_details),
        )
        .route(
            "/api/Articles/{id}",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        // Article paragraphs
        .route(
            "/api/ArticleParagraphs",
            get(handlers::list_paragraphs).post(handlers::create_paragraph),
        )
        .route(
            "/api/ArticleParagraphs/GetArticleParagraphDetails/{id}",
            get(handlers::get_paragraph_details),
        )
        .route(
            "/api/ArticleParagraphs/{id}",
            get(handlers::get_paragraph)
                .put(handlers::update_paragraph)
                .delete(handlers::delete_paragraph),
        )
        .route("/health", get(handlers::health_check));

    let mut router = api_routes.nest_service(
        &format!("/{IMAGES_DIR}"),
        ServeDir::new(state.images.root()),
    );

    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let path_base = state.config.server.path_base.clone();
    let body_limit = state.config.server.max_upload_bytes;

    let router = router
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let router = if path_base.is_empty() {
        router
    } else {
        Router::new().nest(&path_base, router)
    };

    router.layer(TraceLayer::new_for_http())
}
