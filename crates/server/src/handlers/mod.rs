//! HTTP request handlers.

pub mod articles;
pub mod categories;
pub mod common;
pub mod health;
pub mod paragraphs;

pub use articles::*;
pub use categories::*;
pub use health::*;
pub use paragraphs::*;
