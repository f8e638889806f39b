//! Page addressing and localization for the wk wiki.
//!
//! This crate provides:
//! - [`PageName`] and [`Culture`]: validated page identifiers and locale tags
//! - [`file_path`] / [`parse_page_path`]: page name and culture to storage path and back
//! - [`relative_path`]: shortest relative link between two pages
//! - [`build_site_map`]: navigation forest from a flat page listing
//!
//! All functions are pure and perform no I/O.
//!
//! # Quick Start
//!
//! ```
//! use wk_page::{Culture, file_path, parse_page_path, relative_path};
//!
//! let neutral = Culture::new("en")?;
//! let path = file_path("docs/guide", Some("fr"), &neutral)?;
//! assert_eq!(path, "docs/guide.fr.md");
//!
//! let parsed = parse_page_path(&path);
//! assert_eq!(parsed.page_name, "docs/guide");
//!
//! assert_eq!(relative_path("docs/api/reference", "docs/guide")?, "../guide");
//! # Ok::<(), wk_page::ValidationError>(())
//! ```

mod identifier;
mod link;
mod locale;
mod path;
mod site_map;

pub use identifier::{Culture, PageName, ValidationError, validate_culture, validate_page_name};
pub use link::relative_path;
pub use path::{
    MARKDOWN_EXTENSION, ParsedPagePath, file_path, localized_variants, localized_version_of,
    parse_page_path,
};
pub use site_map::{BreadcrumbItem, PageRecord, SiteMap, SiteMapNode, build_site_map};
