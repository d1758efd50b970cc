//! Repository traits for metadata operations.

pub mod articles;
pub mod categories;
pub mod paragraphs;

pub use articles::ArticleRepo;
pub use categories::CategoryRepo;
pub use paragraphs::ArticleParagraphRepo;
