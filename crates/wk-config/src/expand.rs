//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_unchanged() {
        assert_eq!(expand_env("en", "site.neutral_culture").unwrap(), "en");
    }

    #[test]
    fn test_default_value_used_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("WK_EXPAND_TEST_UNSET");
        }
        assert_eq!(
            expand_env("${WK_EXPAND_TEST_UNSET:-fr}", "site.neutral_culture").unwrap(),
            "fr"
        );
    }

    #[test]
    fn test_missing_variable_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("WK_EXPAND_TEST_MISSING");
        }
        let err = expand_env("${WK_EXPAND_TEST_MISSING}", "access.rules_file").unwrap_err();
        assert!(err.to_string().contains("access.rules_file"));
        assert!(err.to_string().contains("WK_EXPAND_TEST_MISSING"));
    }
}
