//! Stored image name generation.
//!
//! Uploaded images are renamed to `<stem><timestamp><ext>` where `stem` is the
//! first [`IMAGE_STEM_LEN`](crate::IMAGE_STEM_LEN) characters of the original
//! file stem with spaces replaced by hyphens, and `timestamp` is two-digit
//! year, minute, second and millisecond. Two uploads of the same file within
//! the same millisecond get the same name.

use crate::IMAGE_STEM_LEN;
use crate::error::{Error, Result};
use time::OffsetDateTime;
use time::macros::format_description;

/// Derive the stored name for an uploaded image.
///
/// The extension starts at the last `.` of the file name, so `.png` has an
/// empty stem and `archive.tar.gz` keeps `archive.tar` as its stem.
pub fn stored_image_name(original: &str, now: OffsetDateTime) -> Result<String> {
    // Some clients send full paths; only the final component matters.
    let file_name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, extension) = split_extension(file_name);

    let stem: String = stem
        .chars()
        .take(IMAGE_STEM_LEN)
        .collect::<String>()
        .replace(' ', "-");

    let stamp = now.format(format_description!(
        "[year repr:last_two][minute][second][subsecond digits:3]"
    ))?;

    let name = format!("{stem}{stamp}{extension}");
    validate_stored_name(&name).map_err(|_| Error::InvalidImageName(original.to_string()))?;
    Ok(name)
}

/// Split `name` into stem and extension (with its dot). A trailing dot
/// yields an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => (&name[..i], &name[i..]),
        Some(i) => (&name[..i], ""),
        None => (name, ""),
    }
}

/// Check that `name` is usable as a stored image name: a single plain file
/// name that is not hidden.
pub fn validate_stored_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidImageName(name.to_string()));
    }
    Ok(())
}
