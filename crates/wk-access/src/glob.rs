//! Glob matching for `/`-separated paths.
//!
//! Supported forms:
//! - literal segments match only themselves
//! - `*` inside a segment matches any run of characters except `/`
//! - `**` as a whole segment matches zero or more complete segments
//!
//! Matching is anchored at both ends. Patterns compile to a [`Regex`] once
//! and can be reused for any number of paths.

use std::fmt;

use regex::Regex;

/// Error returned when a glob pattern is malformed.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Pattern is empty or whitespace only.
    #[error("Pattern cannot be empty")]
    Empty,
    /// Pattern has an empty segment (leading/trailing `/` or `//`).
    #[error("Pattern '{0}' contains an empty segment")]
    EmptySegment(String),
    /// Pattern starts with `#`, which the rule file reads as a comment.
    #[error("Pattern '{0}' cannot start with '#'")]
    CommentPrefix(String),
    /// Pattern contains `|`, the rule file field separator.
    #[error("Pattern '{0}' cannot contain '|'")]
    FieldSeparator(String),
    /// `**` combined with other characters inside a segment.
    #[error("Pattern '{0}' uses '**' inside a segment; '**' must be a whole segment")]
    EmbeddedRecursiveWildcard(String),
    /// Generated expression failed to compile.
    #[error("Pattern '{pattern}' failed to compile: {source}")]
    Compile {
        /// Offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

const RECURSIVE: &str = "**";

/// Compiled glob pattern.
#[derive(Clone, Debug)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Validate and compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        if pattern.starts_with('#') {
            return Err(PatternError::CommentPrefix(pattern.to_owned()));
        }
        if pattern.contains('|') {
            return Err(PatternError::FieldSeparator(pattern.to_owned()));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in pattern.split('/') {
            if segment.is_empty() {
                return Err(PatternError::EmptySegment(pattern.to_owned()));
            }
            if segment != RECURSIVE && segment.contains(RECURSIVE) {
                return Err(PatternError::EmbeddedRecursiveWildcard(pattern.to_owned()));
            }
            // Consecutive `**` segments are equivalent to one.
            if segment == RECURSIVE && segments.last() == Some(&RECURSIVE) {
                continue;
            }
            segments.push(segment);
        }

        let expr = to_regex(&segments);
        let regex = Regex::new(&expr).map_err(|source| PatternError::Compile {
            pattern: pattern.to_owned(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_owned(),
            regex,
        })
    }

    /// Original pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether the whole path matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Translate validated segments into an anchored expression.
fn to_regex(segments: &[&str]) -> String {
    if segments == [RECURSIVE] {
        return "^.*$".to_owned();
    }

    let mut expr = String::from("^");
    // Whether the next literal segment must be preceded by a separator.
    let mut needs_separator = false;

    for &segment in segments {
        if segment == RECURSIVE {
            if needs_separator {
                expr.push_str("(?:/[^/]+)*");
            } else {
                expr.push_str("(?:[^/]+/)*");
            }
            continue;
        }

        if needs_separator {
            expr.push('/');
        }
        for (i, literal) in segment.split('*').enumerate() {
            if i > 0 {
                expr.push_str("[^/]*");
            }
            expr.push_str(&regex::escape(literal));
        }
        needs_separator = true;
    }

    expr.push('$');
    expr
}

/// Match a path against a pattern.
///
/// Total: a pattern that fails validation never matches.
#[must_use]
pub fn matches(pattern: &str, path: &str) -> bool {
    GlobPattern::new(pattern).is_ok_and(|p| p.is_match(path))
}
