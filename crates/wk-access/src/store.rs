//! Active rule set with atomic replacement.
//!
//! Uses `arc-swap` for lock-free reads: evaluators load the current
//! [`AccessRuleSet`] snapshot and keep it for the duration of a check, while
//! an administrator edit builds a complete new snapshot and swaps it in.
//! A rejected edit leaves the active snapshot untouched.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::evaluator::{AccessDecision, check_access};
use crate::rules::{AccessRuleSet, RuleSyntaxError};

/// Holder of the active access rule snapshot.
#[derive(Debug)]
pub struct RuleStore {
    current: ArcSwap<AccessRuleSet>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new(AccessRuleSet::new())
    }
}

impl RuleStore {
    /// Create a store with an initial rule set.
    #[must_use]
    pub fn new(rule_set: AccessRuleSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(rule_set),
        }
    }

    /// Create a store from rule file text.
    pub fn from_text(text: &str) -> Result<Self, RuleSyntaxError> {
        AccessRuleSet::parse(text).map(Self::new)
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AccessRuleSet> {
        self.current.load_full()
    }

    /// Parse `text` and make it the active rule set.
    ///
    /// Returns the number of rules now active.
    pub fn replace(&self, text: &str) -> Result<usize, RuleSyntaxError> {
        match AccessRuleSet::parse(text) {
            Ok(rule_set) => {
                let rule_count = rule_set.len();
                self.current.store(Arc::new(rule_set));
                tracing::info!(rule_count, "Access rules replaced");
                Ok(rule_count)
            }
            Err(e) => {
                tracing::warn!(line = e.line, error = %e, "Rejected access rule update");
                Err(e)
            }
        }
    }

    /// Decide access against the current snapshot.
    #[must_use]
    pub fn check<S: AsRef<str>>(&self, target_path: &str, caller_groups: &[S]) -> AccessDecision {
        check_access(&self.current.load(), target_path, caller_groups)
    }
}
