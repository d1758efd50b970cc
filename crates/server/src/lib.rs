//! HTTP API server for the blog.
//!
//! This crate provides:
//! - CRUD endpoints for categories, articles, and article paragraphs
//! - Multipart form decoding with optional image upload
//! - Projection of stored rows into responses with absolute image URLs
//! - Static serving of uploaded images under `/Images`

pub mod context;
pub mod error;
pub mod form;
pub mod handlers;
pub mod metrics;
pub mod projection;
pub mod routes;
pub mod state;

pub use context::RequestContext;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
