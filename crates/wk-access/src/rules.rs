//! Access rule list and its text format.
//!
//! # Rule File Format
//!
//! One rule per line, three `|`-separated fields:
//!
//! ```text
//! # pattern   | read groups    | write groups
//! admin/**    | admins         | admins
//! docs/**     | *              | editors, admins
//! *           | users          | editors
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Group fields are
//! comma-separated; tokens are trimmed but otherwise kept as written, so a
//! blank field yields a single empty token. Rules keep their file order,
//! which decides evaluation order.

use std::fmt;

use crate::glob::{GlobPattern, PatternError};

const FIELD_SEPARATOR: char = '|';
const GROUP_SEPARATOR: char = ',';
const COMMENT_PREFIX: char = '#';

/// Single access rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRule {
    pattern: GlobPattern,
    read_groups: Vec<String>,
    write_groups: Vec<String>,
    order: usize,
}

impl AccessRule {
    /// Glob pattern selecting the paths this rule applies to.
    #[must_use]
    pub fn pattern(&self) -> &GlobPattern {
        &self.pattern
    }

    /// Groups allowed to read.
    #[must_use]
    pub fn read_groups(&self) -> &[String] {
        &self.read_groups
    }

    /// Groups allowed to edit.
    #[must_use]
    pub fn write_groups(&self) -> &[String] {
        &self.write_groups
    }

    /// Zero-based position in the rule list.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }
}

/// Why a rule line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RuleSyntaxReason {
    /// Line does not have exactly three fields.
    #[error("expected 3 '|'-separated fields, found {0}")]
    FieldCount(usize),
    /// Pattern field is not a valid glob.
    #[error("{0}")]
    InvalidPattern(#[from] PatternError),
}

/// Error returned when a rule line cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid access rule on line {line} ('{text}'): {reason}")]
pub struct RuleSyntaxError {
    /// 1-based line number.
    pub line: usize,
    /// Line content as written.
    pub text: String,
    /// Rejection reason.
    #[source]
    pub reason: RuleSyntaxReason,
}

/// Ordered, immutable-once-built list of access rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessRuleSet {
    rules: Vec<AccessRule>,
}

/// Trim tokens and drop exact duplicates, keeping first occurrence order.
///
/// An empty list is stored as a single empty token, the form a blank field
/// parses to.
fn collect_groups<I, S>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for group in groups {
        let group = group.as_ref().trim();
        if !out.iter().any(|g| g == group) {
            out.push(group.to_owned());
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

impl AccessRuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; its order is the current rule count.
    ///
    /// Fails if the trimmed pattern is not a valid glob, or starts with `#`
    /// or contains `|` and so could not be written back to a rule file.
    pub fn push<R, W, S>(
        &mut self,
        pattern: &str,
        read_groups: R,
        write_groups: W,
    ) -> Result<&mut Self, PatternError>
    where
        R: IntoIterator<Item = S>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = GlobPattern::new(pattern.trim())?;
        self.rules.push(AccessRule {
            pattern,
            read_groups: collect_groups(read_groups),
            write_groups: collect_groups(write_groups),
            order: self.rules.len(),
        });
        Ok(self)
    }

    /// Parse the rule file format.
    ///
    /// The whole text is rejected on the first malformed line.
    pub fn parse(text: &str) -> Result<Self, RuleSyntaxError> {
        let mut rule_set = Self::new();

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let syntax_error = |reason| RuleSyntaxError {
                line: idx + 1,
                text: line.to_owned(),
                reason,
            };

            let fields: Vec<&str> = trimmed.split(FIELD_SEPARATOR).map(str::trim).collect();
            let [pattern, read, write] = fields.as_slice() else {
                return Err(syntax_error(RuleSyntaxReason::FieldCount(fields.len())));
            };

            rule_set
                .push(
                    pattern,
                    read.split(GROUP_SEPARATOR),
                    write.split(GROUP_SEPARATOR),
                )
                .map_err(|e| syntax_error(e.into()))?;
        }

        Ok(rule_set)
    }

    /// Render the rule file format, one rule per line in order.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Iterate over rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, AccessRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccessRuleSet {
    type Item = &'a AccessRule;
    type IntoIter = std::slice::Iter<'a, AccessRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for AccessRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(
                f,
                "{} | {} | {}",
                rule.pattern,
                rule.read_groups.join(", "),
                rule.write_groups.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_assigns_order_skipping_comments() {
        let text = "\
# Access rules
admin/** | admins | admins

   # indented comment
* | users, editors | editors
";
        let rules = AccessRuleSet::parse(text).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].pattern().as_str(), "admin/**");
        assert_eq!(rules.rules()[0].order(), 0);
        assert_eq!(rules.rules()[1].pattern().as_str(), "*");
        assert_eq!(rules.rules()[1].order(), 1);
        assert_eq!(rules.rules()[1].read_groups(), ["users", "editors"]);
        assert_eq!(rules.rules()[1].write_groups(), ["editors"]);
    }

    #[test]
    fn test_parse_keeps_empty_tokens() {
        let rules = AccessRuleSet::parse("docs/** | readers, , | ").unwrap();
        let rule = &rules.rules()[0];

        assert_eq!(rule.read_groups(), ["readers", ""]);
        assert_eq!(rule.write_groups(), [""]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let rules = AccessRuleSet::parse("a | x | y\r\nb | x | y\r\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[1].write_groups(), ["y"]);
    }

    #[test]
    fn test_parse_rejects_too_few_fields() {
        let err = AccessRuleSet::parse("ok | a | b\nbroken | admins\n").unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.text, "broken | admins");
        assert!(matches!(err.reason, RuleSyntaxReason::FieldCount(2)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_rejects_too_many_fields() {
        let err = AccessRuleSet::parse("a | b | c | d").unwrap_err();
        assert!(matches!(err.reason, RuleSyntaxReason::FieldCount(4)));
    }

    #[test]
    fn test_parse_rejects_invalid_pattern() {
        let err = AccessRuleSet::parse("\n\nadmin** | a | b").unwrap_err();

        assert_eq!(err.line, 3);
        assert!(matches!(
            err.reason,
            RuleSyntaxReason::InvalidPattern(PatternError::EmbeddedRecursiveWildcard(_))
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        let rules = AccessRuleSet::parse("# nothing here\n\n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_serialize_format() {
        let mut rules = AccessRuleSet::new();
        rules.push("admin/**", ["admins"], ["admins"]).unwrap();
        rules.push("*", ["users", "guests"], ["editors"]).unwrap();

        assert_eq!(
            rules.serialize(),
            "admin/** | admins | admins\n* | users, guests | editors\n"
        );
    }

    #[test]
    fn test_parse_serialize_round_trip() {
        let mut rules = AccessRuleSet::new();
        rules.push("admin/**", ["admins"], ["admins"]).unwrap();
        rules.push("docs/*.png", ["*", "readers"], ["editors", ""]).unwrap();
        rules.push("a/**/b", [""], ["x"]).unwrap();
        rules.push("**/index", Vec::<&str>::new(), ["a"]).unwrap();

        let reparsed = AccessRuleSet::parse(&rules.serialize()).unwrap();
        assert_eq!(reparsed, rules);
    }

    #[test]
    fn test_round_trip_preserves_rules_and_order() {
        let cases: &[&[(&str, &[&str], &[&str])]] = &[
            &[],
            &[("**", &["*"], &["admins"])],
            &[
                ("**/index", &["*"], &[""]),
                ("docs/**/img/*.png", &["readers", "editors"], &["editors"]),
                ("*.md", &[], &[]),
            ],
            &[
                ("admin/**", &["admins"], &["admins"]),
                ("a/*/b/**", &["", "x"], &["x", ""]),
                ("docs/#1", &["*", "readers", "*"], &["editors"]),
                ("*", &["users"], &["editors"]),
            ],
        ];

        for case in cases {
            let mut rules = AccessRuleSet::new();
            for &(pattern, read, write) in *case {
                rules.push(pattern, read, write).unwrap();
            }

            let reparsed = AccessRuleSet::parse(&rules.serialize()).unwrap();
            assert_eq!(reparsed, rules);
            assert_eq!(reparsed.serialize(), rules.serialize());
            for (idx, rule) in reparsed.iter().enumerate() {
                assert_eq!(rule.order(), idx);
            }
        }
    }

    #[test]
    fn test_push_empty_group_list_matches_blank_field() {
        let mut rules = AccessRuleSet::new();
        rules.push("x", Vec::<&str>::new(), ["a"]).unwrap();

        assert_eq!(rules.rules()[0].read_groups(), [""]);
        assert_eq!(rules, AccessRuleSet::parse("x |  | a").unwrap());
    }

    #[test]
    fn test_push_rejects_unserializable_patterns() {
        let mut rules = AccessRuleSet::new();

        assert!(matches!(
            rules.push("#drafts/**", ["a"], ["a"]),
            Err(PatternError::CommentPrefix(_))
        ));
        assert!(matches!(
            rules.push("  #drafts", ["a"], ["a"]),
            Err(PatternError::CommentPrefix(_))
        ));
        assert!(matches!(
            rules.push("a|b", ["a"], ["a"]),
            Err(PatternError::FieldSeparator(_))
        ));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_push_deduplicates_groups() {
        let mut rules = AccessRuleSet::new();
        rules.push("*", ["a", " a", "b"], ["c"]).unwrap();
        assert_eq!(rules.rules()[0].read_groups(), ["a", "b"]);
    }
}
