//! Image store backends.

pub mod filesystem;
