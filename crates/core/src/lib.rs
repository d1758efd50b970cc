//! Core domain types and shared logic for the blog API.
//!
//! This crate defines the pieces shared by every other crate:
//! - Application configuration
//! - Entity field rules (length limits, publish dates, flags)
//! - Stored image name generation

pub mod config;
pub mod error;
pub mod fields;
pub mod image_name;

pub use error::{Error, Result};
pub use fields::{parse_flag, parse_publish_date, validate_max_len};
pub use image_name::{stored_image_name, validate_stored_name};

/// Maximum length of bounded text columns (titles, ingress, author).
pub const MAX_TEXT_LEN: usize = 50;

/// Directory under the content root that holds uploaded images.
/// Also the URL segment images are served from.
pub const IMAGES_DIR: &str = "Images";

/// Number of leading characters of the original file stem kept in a stored image name.
pub const IMAGE_STEM_LEN: usize = 10;
