//! Access-control rule engine for the wk wiki.
//!
//! This crate provides:
//! - [`GlobPattern`] / [`matches`]: `*` and `**` glob matching over `/`-separated paths
//! - [`AccessRuleSet`]: ordered rule list with a line-based text format
//! - [`check_access`]: first-match-wins, fail-closed evaluation
//! - [`RuleStore`]: active rule snapshot with atomic replacement
//!
//! # Example
//!
//! ```
//! use wk_access::{AccessRuleSet, check_access};
//!
//! let rules = AccessRuleSet::parse("admin/** | admins | admins\n* | users | editors")?;
//!
//! let decision = check_access(&rules, "admin/settings", &["users"]);
//! assert!(!decision.can_read);
//! assert_eq!(decision.matched_pattern.as_deref(), Some("admin/**"));
//!
//! let decision = check_access(&rules, "home", &["users"]);
//! assert!(decision.can_read);
//! # Ok::<(), wk_access::RuleSyntaxError>(())
//! ```

mod evaluator;
mod glob;
mod rules;
mod store;

pub use evaluator::{AccessDecision, AccessPolicy, EVERYONE, check_access};
pub use glob::{GlobPattern, PatternError, matches};
pub use rules::{AccessRule, AccessRuleSet, RuleSyntaxError, RuleSyntaxReason};
pub use store::RuleStore;
