//! Configuration management for wk.
//!
//! Parses `wk.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.neutral_culture`
//! - `access.rules_file`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use wk_access::AccessPolicy;
use wk_page::Culture;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override neutral culture.
    pub neutral_culture: Option<String>,
    /// Override access rules file.
    pub rules_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wk.toml";

/// Default neutral culture.
const DEFAULT_NEUTRAL_CULTURE: &str = "en";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration.
    pub site: SiteConfig,
    /// Access configuration (paths are relative strings from TOML).
    access: AccessConfigRaw,

    /// Resolved access configuration (set after loading).
    #[serde(skip)]
    pub access_resolved: AccessConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Culture of unsuffixed page files.
    pub neutral_culture: String,
    /// Cultures the site accepts. `None` accepts every recognized culture.
    pub cultures: Option<Vec<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            neutral_culture: DEFAULT_NEUTRAL_CULTURE.to_owned(),
            cultures: None,
        }
    }
}

/// Raw access configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize)]
#[serde(default)]
struct AccessConfigRaw {
    rules_file: Option<String>,
    page_level_permissions: bool,
    site_read_groups: Vec<String>,
    site_write_groups: Vec<String>,
}

impl Default for AccessConfigRaw {
    fn default() -> Self {
        let policy = AccessPolicy::default();
        Self {
            rules_file: None,
            page_level_permissions: policy.page_level_permissions,
            site_read_groups: policy.site_read_groups,
            site_write_groups: policy.site_write_groups,
        }
    }
}

/// Resolved access configuration with absolute paths.
#[derive(Debug)]
pub struct AccessConfig {
    /// Access rules file.
    pub rules_file: PathBuf,
    /// Whether per-path rules are evaluated.
    pub page_level_permissions: bool,
    /// Groups allowed to read when page-level permissions are disabled.
    pub site_read_groups: Vec<String>,
    /// Groups allowed to edit when page-level permissions are disabled.
    pub site_write_groups: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::from_raw(&AccessConfigRaw::default(), Path::new("."))
    }
}

impl AccessConfig {
    fn from_raw(raw: &AccessConfigRaw, base: &Path) -> Self {
        Self {
            rules_file: base.join(raw.rules_file.as_deref().unwrap_or("access.rules")),
            page_level_permissions: raw.page_level_permissions,
            site_read_groups: raw.site_read_groups.clone(),
            site_write_groups: raw.site_write_groups.clone(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.neutral_culture`").
        field: String,
        /// Error message (e.g., "${`WK_CULTURE`} not set").
        message: String,
    },
}

/// Parse a culture field, mapping failures to a validation error naming the field.
fn require_culture(value: &str, field: &str) -> Result<Culture, ConfigError> {
    Culture::new(value).map_err(|e| ConfigError::Validation(format!("{field}: {e}")))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wk.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(culture) = &settings.neutral_culture {
            self.site.neutral_culture.clone_from(culture);
        }
        if let Some(rules_file) = &settings.rules_file {
            self.access_resolved.rules_file.clone_from(rules_file);
        }
    }

    /// Validated neutral culture.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `site.neutral_culture` is not a
    /// recognized culture.
    pub fn neutral_culture(&self) -> Result<Culture, ConfigError> {
        require_culture(&self.site.neutral_culture, "site.neutral_culture")
    }

    /// Validated list of site cultures, `None` if unrestricted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any entry is invalid.
    pub fn cultures(&self) -> Result<Option<Vec<Culture>>, ConfigError> {
        self.site
            .cultures
            .as_ref()
            .map(|list| {
                list.iter()
                    .map(|tag| require_culture(tag, "site.cultures"))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
    }

    /// Check that `culture` is accepted by this site.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the culture is invalid or not
    /// listed in `site.cultures`.
    pub fn require_site_culture(&self, culture: &str) -> Result<Culture, ConfigError> {
        let culture = require_culture(culture, "culture")?;
        if let Some(allowed) = self.cultures()?
            && !allowed.contains(&culture)
        {
            return Err(ConfigError::Validation(format!(
                "culture '{culture}' is not enabled for this site"
            )));
        }
        Ok(culture)
    }

    /// Access policy built from the `[access]` section.
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            page_level_permissions: self.access_resolved.page_level_permissions,
            site_read_groups: self.access_resolved.site_read_groups.clone(),
            site_write_groups: self.access_resolved.site_write_groups.clone(),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let access = AccessConfigRaw::default();
        Self {
            site: SiteConfig::default(),
            access_resolved: AccessConfig::from_raw(&access, base),
            access,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_access()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let neutral = self.neutral_culture()?;

        if let Some(cultures) = self.cultures()? {
            if cultures.is_empty() {
                return Err(ConfigError::Validation(
                    "site.cultures cannot be empty".to_owned(),
                ));
            }
            if !cultures.contains(&neutral) {
                return Err(ConfigError::Validation(format!(
                    "site.cultures must include the neutral culture '{neutral}'"
                )));
            }
        }

        Ok(())
    }

    /// Validate access configuration.
    fn validate_access(&self) -> Result<(), ConfigError> {
        let access = &self.access_resolved;
        let groups = access.site_read_groups.iter().chain(&access.site_write_groups);
        for group in groups {
            if group.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "access site groups cannot contain empty names".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.neutral_culture =
            expand::expand_env(&self.site.neutral_culture, "site.neutral_culture")?;

        if let Some(ref rules_file) = self.access.rules_file {
            self.access.rules_file = Some(expand::expand_env(rules_file, "access.rules_file")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.access_resolved = AccessConfig::from_raw(&self.access, config_dir);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.neutral_culture, "en");
        assert!(config.site.cultures.is_none());
        assert_eq!(
            config.access_resolved.rules_file,
            PathBuf::from("/test/access.rules")
        );
        assert!(config.access_resolved.page_level_permissions);
        assert_eq!(config.access_resolved.site_read_groups, vec!["*".to_owned()]);
        assert!(config.access_resolved.site_write_groups.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.neutral_culture, "en");
        assert!(config.access.page_level_permissions);
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
neutral_culture = "de"
cultures = ["de", "fr", "pt-BR"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.neutral_culture, "de");
        assert_eq!(
            config.cultures().unwrap(),
            Some(vec![
                Culture::new("de").unwrap(),
                Culture::new("fr").unwrap(),
                Culture::new("pt-BR").unwrap(),
            ])
        );
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[access]
rules_file = "config/acl.rules"
page_level_permissions = false
site_read_groups = ["staff"]
site_write_groups = ["editors", "admins"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.access_resolved.rules_file,
            PathBuf::from("/project/config/acl.rules")
        );
        assert_eq!(
            config.access_policy(),
            AccessPolicy {
                page_level_permissions: false,
                site_read_groups: vec!["staff".to_owned()],
                site_write_groups: vec!["editors".to_owned(), "admins".to_owned()],
            }
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wk.toml");
        std::fs::write(
            &path,
            "[site]\nneutral_culture = \"fr\"\n\n[access]\nrules_file = \"rules.txt\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.neutral_culture().unwrap(), Culture::new("fr").unwrap());
        assert_eq!(config.access_resolved.rules_file, dir.path().join("rules.txt"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/wk.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wk.toml");
        std::fs::write(&path, "[site\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_culture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wk.toml");
        std::fs::write(&path, "[site]\nneutral_culture = \"english\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.neutral_culture"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            neutral_culture: Some("es".to_owned()),
            rules_file: Some(PathBuf::from("/custom/rules")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.neutral_culture, "es");
        assert_eq!(
            config.access_resolved.rules_file,
            PathBuf::from("/custom/rules")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site.neutral_culture, "en");
        assert_eq!(
            config.access_resolved.rules_file,
            PathBuf::from("/test/access.rules")
        );
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("WK_TEST_CULTURE", "it");
        }

        let toml = r#"
[site]
neutral_culture = "${WK_TEST_CULTURE}"

[access]
rules_file = "${WK_TEST_RULES:-default.rules}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.site.neutral_culture, "it");
        assert_eq!(config.access.rules_file.as_deref(), Some("default.rules"));

        unsafe {
            std::env::remove_var("WK_TEST_CULTURE");
        }
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_neutral_culture() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.neutral_culture = "xx".to_owned();
        assert_validation_error(&config, &["site.neutral_culture", "xx"]);
    }

    #[test]
    fn test_validate_cultures_must_include_neutral() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.cultures = Some(vec!["fr".to_owned(), "de".to_owned()]);
        assert_validation_error(&config, &["site.cultures", "en"]);
    }

    #[test]
    fn test_validate_cultures_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.cultures = Some(Vec::new());
        assert_validation_error(&config, &["site.cultures", "empty"]);
    }

    #[test]
    fn test_validate_invalid_culture_in_list() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.cultures = Some(vec!["en".to_owned(), "EN".to_owned()]);
        assert_validation_error(&config, &["site.cultures", "EN"]);
    }

    #[test]
    fn test_validate_empty_site_group() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.access_resolved.site_write_groups = vec![" ".to_owned()];
        assert_validation_error(&config, &["empty"]);
    }

    #[test]
    fn test_require_site_culture() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert!(config.require_site_culture("fr").is_ok());

        config.site.cultures = Some(vec!["en".to_owned(), "de".to_owned()]);
        assert!(config.require_site_culture("de").is_ok());
        let err = config.require_site_culture("fr").unwrap_err();
        assert!(err.to_string().contains("not enabled"));
    }
}
