//! `wk access` command implementations.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use wk_access::{AccessDecision, AccessRuleSet};

use super::ConfigArgs;
use crate::error::{CliError, read_file};
use crate::output::Output;

/// Access rule commands.
#[derive(Subcommand, Debug)]
pub(crate) enum AccessCommand {
    /// Check whether a caller may read or edit a path.
    Check(CheckArgs),
    /// Validate a rule file and print it in canonical form.
    Fmt(FmtArgs),
}

impl AccessCommand {
    /// Execute the access command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        match self {
            Self::Check(args) => args.execute(output),
            Self::Fmt(args) => args.execute(output),
        }
    }
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Target path (page name or storage path).
    path: String,

    /// Caller group (repeatable; none means anonymous).
    #[arg(short, long = "group")]
    groups: Vec<String>,

    /// Access rules file (overrides config).
    #[arg(short, long)]
    rules: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    /// Execute the check command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load(self.rules)?;
        let policy = config.access_policy();

        let rule_set = if policy.page_level_permissions {
            AccessRuleSet::parse(&read_file(&config.access_resolved.rules_file)?)?
        } else {
            tracing::info!("Page-level permissions disabled, using site groups");
            AccessRuleSet::new()
        };

        let decision = policy.check(&rule_set, &self.path, &self.groups);
        for line in describe_decision(&decision) {
            output.result(&line);
        }
        if decision.can_read || decision.can_edit {
            output.success("Access granted");
        } else {
            output.warning("Access denied");
        }
        Ok(())
    }
}

/// Render a decision as human-readable lines.
fn describe_decision(decision: &AccessDecision) -> Vec<String> {
    let verdict = |allowed: bool| if allowed { "allowed" } else { "denied" };
    vec![
        format!("read: {}", verdict(decision.can_read)),
        format!("edit: {}", verdict(decision.can_edit)),
        format!(
            "rule: {}",
            decision.matched_pattern.as_deref().unwrap_or("(none)")
        ),
    ]
}

/// Arguments for the fmt command.
#[derive(Args, Debug)]
pub(crate) struct FmtArgs {
    /// Rule file to validate.
    file: PathBuf,

    /// Rewrite the file in place instead of printing.
    #[arg(long)]
    write: bool,
}

impl FmtArgs {
    /// Execute the fmt command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let rule_set = AccessRuleSet::parse(&read_file(&self.file)?)?;
        let text = rule_set.serialize();

        if self.write {
            std::fs::write(&self.file, text)?;
            output.success(&format!(
                "Wrote {} rules to {}",
                rule_set.len(),
                self.file.display()
            ));
        } else {
            output.result(text.trim_end());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_describe_decision_matched() {
        let decision = AccessDecision {
            can_read: true,
            can_edit: false,
            matched_pattern: Some("docs/**".to_owned()),
        };
        assert_eq!(
            describe_decision(&decision),
            vec!["read: allowed", "edit: denied", "rule: docs/**"]
        );
    }

    #[test]
    fn test_describe_decision_unmatched() {
        assert_eq!(
            describe_decision(&AccessDecision::denied()),
            vec!["read: denied", "edit: denied", "rule: (none)"]
        );
    }

    #[test]
    fn test_fmt_write_rewrites_canonical_form() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("access.rules");
        std::fs::write(
            &file,
            "# comment\nadmin/**|admins|admins\n\n*  |users,editors| editors\n",
        )
        .unwrap();

        FmtArgs {
            file: file.clone(),
            write: true,
        }
        .execute(&Output::new())
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "admin/** | admins | admins\n* | users, editors | editors\n"
        );
    }

    #[test]
    fn test_fmt_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("access.rules");
        std::fs::write(&file, "admin/** | admins\n").unwrap();

        let err = FmtArgs {
            file: file.clone(),
            write: true,
        }
        .execute(&Output::new())
        .unwrap_err();

        assert!(matches!(err, CliError::Rules(_)));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "admin/** | admins\n");
    }
}
