//! CLI error types.

use std::path::PathBuf;

use wk_access::RuleSyntaxError;
use wk_config::ConfigError;
use wk_page::ValidationError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page listing: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Rules(#[from] RuleSyntaxError),
}

/// Read a file to string, keeping the path in the error.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<u8>("not json").unwrap_err()
    }

    #[test]
    fn test_input_and_output_json_errors_are_distinct() {
        let input = CliError::from(json_error()).to_string();
        let output = CliError::Output(json_error()).to_string();

        assert!(input.starts_with("Invalid page listing: "));
        assert!(output.starts_with("Failed to serialize output: "));
    }
}
