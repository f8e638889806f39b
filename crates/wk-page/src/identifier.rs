//! Page name and culture validation.
//!
//! [`PageName`] and [`Culture`] can only be constructed through validation,
//! so any value of these types upholds the naming rules:
//!
//! - Page names are non-empty, use only `[a-zA-Z0-9_/-]`, contain no `..` or
//!   `//`, and neither start nor end with `/`.
//! - Cultures are `xx` or `xx-XX` tags naming a recognized locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locale::{is_known_language, is_known_region};

/// Error returned when a page name or culture tag is invalid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Page name is empty or whitespace only.
    #[error("Page name cannot be empty")]
    EmptyPageName,
    /// Page name contains a character outside `[a-zA-Z0-9_/-]`.
    #[error("Page name '{name}' contains invalid character '{ch}'")]
    InvalidCharacter {
        /// Rejected page name.
        name: String,
        /// First offending character.
        ch: char,
    },
    /// Page name contains `..`.
    #[error("Page name '{0}' cannot contain '..'")]
    ParentTraversal(String),
    /// Page name contains `//`.
    #[error("Page name '{0}' cannot contain '//'")]
    EmptySegment(String),
    /// Page name starts or ends with `/`.
    #[error("Page name '{0}' cannot start or end with '/'")]
    SurroundingSlash(String),
    /// Culture tag does not match `xx` or `xx-XX`.
    #[error("Culture '{0}' is not a valid locale tag (expected 'xx' or 'xx-XX')")]
    MalformedCulture(String),
    /// Culture tag is well formed but names no known locale.
    #[error("Culture '{0}' is not a recognized locale")]
    UnknownCulture(String),
}

/// Validated page identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageName(String);

impl PageName {
    /// Validate and wrap a page name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_page_name(&name)?;
        Ok(Self(name))
    }

    /// Page name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Final segment (the page's own name within its directory).
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, last)| last)
    }

    /// Directory part, `None` for top-level pages.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Zero-based depth (number of `/` separators).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PageName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PageName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageName> for String {
    fn from(name: PageName) -> Self {
        name.0
    }
}

/// Validated locale tag such as `fr` or `pt-BR`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Culture(String);

impl Culture {
    /// Validate and wrap a culture tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, ValidationError> {
        let tag = tag.into();
        validate_culture(&tag)?;
        Ok(Self(tag))
    }

    /// Tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language part (`pt` for `pt-BR`).
    #[must_use]
    pub fn language(&self) -> &str {
        &self.0[..2]
    }

    /// Region part (`BR` for `pt-BR`), if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.0.get(3..)
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Culture {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Culture {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Culture {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Culture> for String {
    fn from(culture: Culture) -> Self {
        culture.0
    }
}

fn is_page_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-')
}

/// Validate a page name.
pub fn validate_page_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyPageName);
    }
    if name.contains("..") {
        return Err(ValidationError::ParentTraversal(name.to_owned()));
    }
    if let Some(ch) = name.chars().find(|&ch| !is_page_name_char(ch)) {
        return Err(ValidationError::InvalidCharacter {
            name: name.to_owned(),
            ch,
        });
    }
    if name.contains("//") {
        return Err(ValidationError::EmptySegment(name.to_owned()));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(ValidationError::SurroundingSlash(name.to_owned()));
    }
    Ok(())
}

/// Validate a culture tag against the `xx` / `xx-XX` shape and the locale tables.
pub fn validate_culture(tag: &str) -> Result<(), ValidationError> {
    let (language, region) = match tag.split_once('-') {
        Some((language, region)) => (language, Some(region)),
        None => (tag, None),
    };

    let well_formed = language.len() == 2
        && language.bytes().all(|b| b.is_ascii_lowercase())
        && region.is_none_or(|r| r.len() == 2 && r.bytes().all(|b| b.is_ascii_uppercase()));
    if !well_formed {
        return Err(ValidationError::MalformedCulture(tag.to_owned()));
    }

    if !is_known_language(language) || !region.is_none_or(is_known_region) {
        return Err(ValidationError::UnknownCulture(tag.to_owned()));
    }
    Ok(())
}
