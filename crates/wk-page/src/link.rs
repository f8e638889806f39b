//! Relative hyperlinks between pages.
//!
//! Page names are treated as virtual directory paths: the link from
//! `docs/api/reference` to `docs/guide` climbs out of `api` and lands on
//! `guide`, giving `../guide`.

use crate::identifier::{PageName, ValidationError};

/// Compute the shortest relative link from one page to another.
///
/// # Errors
///
/// Returns [`ValidationError`] if either page name is invalid.
pub fn relative_path(from: &str, to: &str) -> Result<String, ValidationError> {
    let from = PageName::new(from)?;
    let to = PageName::new(to)?;

    let from_segments: Vec<&str> = from.segments().collect();
    let to_segments: Vec<&str> = to.segments().collect();

    // Only directory parts take part in the common prefix.
    let from_dirs = &from_segments[..from_segments.len() - 1];
    let to_dirs = &to_segments[..to_segments.len() - 1];
    let common = from_dirs
        .iter()
        .zip(to_dirs)
        .take_while(|(a, b)| a == b)
        .count();

    let levels_up = from_dirs.len() - common;
    let parts: Vec<&str> = std::iter::repeat_n("..", levels_up)
        .chain(to_segments[common..].iter().copied())
        .collect();

    Ok(parts.join("/"))
}
