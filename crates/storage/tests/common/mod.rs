pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{TestImages, tiny_png};
