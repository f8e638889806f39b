//! First-match-wins evaluation of access rules.
//!
//! # Group Semantics
//!
//! - The reserved group `*` grants everyone, including anonymous callers
//!   with no groups.
//! - An empty group token (for example a blank field in the rule file)
//!   grants nobody.
//! - A path matched by no rule is denied for both read and edit.

use serde::Serialize;

use crate::rules::AccessRuleSet;

/// Reserved group name granting every caller.
pub const EVERYONE: &str = "*";

/// Outcome of an access check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Caller may read the path.
    pub can_read: bool,
    /// Caller may edit the path.
    pub can_edit: bool,
    /// Pattern of the rule that decided, `None` if no rule applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

impl AccessDecision {
    /// Decision denying both read and edit with no matched rule.
    #[must_use]
    pub fn denied() -> Self {
        Self::default()
    }
}

/// Check whether `rule_groups` grants any of `caller_groups`.
fn grants<S: AsRef<str>>(rule_groups: &[String], caller_groups: &[S]) -> bool {
    rule_groups.iter().any(|group| {
        group == EVERYONE
            || (!group.is_empty() && caller_groups.iter().any(|c| c.as_ref() == group))
    })
}

fn normalize_target(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_owned()
}

/// Decide read/edit access for `target_path`.
///
/// Rules are tried in order; the first whose pattern matches decides.
#[must_use]
pub fn check_access<S: AsRef<str>>(
    rule_set: &AccessRuleSet,
    target_path: &str,
    caller_groups: &[S],
) -> AccessDecision {
    let target = normalize_target(target_path);

    let Some(rule) = rule_set.iter().find(|rule| rule.pattern().is_match(&target)) else {
        tracing::trace!(path = %target, "No access rule matched");
        return AccessDecision::denied();
    };

    AccessDecision {
        can_read: grants(rule.read_groups(), caller_groups),
        can_edit: grants(rule.write_groups(), caller_groups),
        matched_pattern: Some(rule.pattern().as_str().to_owned()),
    }
}

/// Site-wide access policy.
///
/// When page-level permissions are disabled the rule list is ignored and
/// every path is decided by the site-wide groups alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Whether per-path rules are evaluated.
    pub page_level_permissions: bool,
    /// Groups allowed to read when page-level permissions are disabled.
    pub site_read_groups: Vec<String>,
    /// Groups allowed to edit when page-level permissions are disabled.
    pub site_write_groups: Vec<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            page_level_permissions: true,
            site_read_groups: vec![EVERYONE.to_owned()],
            site_write_groups: Vec::new(),
        }
    }
}

impl AccessPolicy {
    /// Decide access for `target_path` under this policy.
    #[must_use]
    pub fn check<S: AsRef<str>>(
        &self,
        rule_set: &AccessRuleSet,
        target_path: &str,
        caller_groups: &[S],
    ) -> AccessDecision {
        if self.page_level_permissions {
            return check_access(rule_set, target_path, caller_groups);
        }

        AccessDecision {
            can_read: grants(&self.site_read_groups, caller_groups),
            can_edit: grants(&self.site_write_groups, caller_groups),
            matched_pattern: None,
        }
    }
}
