//! Mapping between page names and storage file paths.
//!
//! # File Naming Convention
//!
//! Page content is stored in markdown files. Localized variants insert the
//! culture tag immediately before the extension:
//!
//! - `"docs/guide"` in the neutral culture - `docs/guide.md`
//! - `"docs/guide"` in `fr` - `docs/guide.fr.md`
//! - `"docs/guide"` in `pt-BR` - `docs/guide.pt-BR.md`

use crate::identifier::{Culture, PageName, ValidationError};

/// Extension of page content files.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Page identity recovered from a storage file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPagePath {
    /// Page name (directory plus file stem, without culture or extension).
    pub page_name: String,
    /// Culture from the file name infix, `None` for neutral files.
    pub culture: Option<Culture>,
}

/// Normalize separators and trim surrounding slashes.
fn normalize_stem(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_owned()
}

/// Split a `/`-separated path into its directory and file name.
fn split_file_name(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dir, file)) if !dir.is_empty() => (Some(dir), file),
        Some((_, file)) => (None, file),
        None => (None, path),
    }
}

/// Drop the final extension of a file name. Dot files keep their name.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => file_name,
    }
}

/// Resolve the storage path of a page.
///
/// The culture is validated only when it differs from `neutral`; the neutral
/// culture (or none) maps to the unsuffixed file.
///
/// # Errors
///
/// Returns [`ValidationError`] if the page name or a non-neutral culture is invalid.
pub fn file_path(
    page_name: &str,
    culture: Option<&str>,
    neutral: &Culture,
) -> Result<String, ValidationError> {
    let name = PageName::new(page_name)?;
    let stem = normalize_stem(name.as_str());

    match culture {
        Some(tag) if tag != neutral.as_str() => {
            let culture = Culture::new(tag)?;
            Ok(format!("{stem}.{culture}{MARKDOWN_EXTENSION}"))
        }
        _ => Ok(format!("{stem}{MARKDOWN_EXTENSION}")),
    }
}

/// Recover the page name and culture from a storage file path.
///
/// A trailing `.{culture}` infix is recognized only if it validates as a
/// culture; anything else is kept as part of the page name. Never fails.
#[must_use]
pub fn parse_page_path(file_path: &str) -> ParsedPagePath {
    let normalized = normalize_stem(file_path);
    let (dir, file_name) = split_file_name(&normalized);
    let name = strip_extension(file_name);

    let (stem, culture) = match name.rsplit_once('.') {
        Some((rest, tag)) => match Culture::new(tag) {
            Ok(culture) => (rest, Some(culture)),
            Err(_) => (name, None),
        },
        None => (name, None),
    };

    let page_name = match dir {
        Some(dir) => format!("{dir}/{stem}"),
        None => stem.to_owned(),
    };

    ParsedPagePath { page_name, culture }
}

/// Check whether `file_name` holds a version of `page_name`.
///
/// Returns the culture of the matching file: `neutral` for the unsuffixed
/// file, the infix culture for a localized one, `None` if the file belongs
/// to another page.
#[must_use]
pub fn localized_version_of(
    file_name: &str,
    page_name: &str,
    neutral: &Culture,
) -> Option<Culture> {
    let page = PageName::new(page_name).ok()?;
    let stem = normalize_stem(page.as_str());

    let normalized = normalize_stem(file_name);
    let (dir, file) = split_file_name(&normalized);
    let file = strip_extension(file);
    let candidate = match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file.to_owned(),
    };

    if candidate == stem {
        return Some(neutral.clone());
    }

    candidate
        .strip_prefix(stem.as_str())
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|tag| Culture::new(tag).ok())
}

/// Collect the cultures available for a page from a file listing.
///
/// The neutral culture comes first (if present), followed by the other
/// cultures in ascending order without duplicates.
pub fn localized_variants<'a>(
    file_names: impl IntoIterator<Item = &'a str>,
    page_name: &str,
    neutral: &Culture,
) -> Vec<Culture> {
    let mut has_neutral = false;
    let mut others: Vec<Culture> = file_names
        .into_iter()
        .filter_map(|file| localized_version_of(file, page_name, neutral))
        .filter(|culture| {
            if culture == neutral {
                has_neutral = true;
                false
            } else {
                true
            }
        })
        .collect();
    others.sort();
    others.dedup();

    if has_neutral {
        others.insert(0, neutral.clone());
    }
    others
}
