use crate::config::OutputFormat;
use crate::utils::error::{GrabError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `port-grab.toml`. Every key is optional; missing keys fall
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub directory: Option<String>,
    pub file_prefix: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| GrabError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GrabError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GrabError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[discovery]
directory = "./stacks"
file_prefix = "compose"
extensions = ["yml", "yaml"]
exclude_dirs = ["vendor"]

[filter]
pattern = "80xx"

[output]
format = "json"

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.discovery.directory.as_deref(), Some("./stacks"));
        assert_eq!(config.discovery.file_prefix.as_deref(), Some("compose"));
        assert_eq!(
            config.discovery.extensions,
            Some(vec!["yml".to_string(), "yaml".to_string()])
        );
        assert_eq!(config.filter.pattern.as_deref(), Some("80xx"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert_eq!(config.logging.json, Some(true));
    }

    #[test]
    fn test_empty_config() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.discovery.directory.is_none());
        assert!(config.filter.pattern.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PORT_GRAB_TEST_STACKS", "/srv/stacks");

        let toml_content = r#"
[discovery]
directory = "${PORT_GRAB_TEST_STACKS}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.discovery.directory.as_deref(), Some("/srv/stacks"));

        std::env::remove_var("PORT_GRAB_TEST_STACKS");
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let result = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(GrabError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[filter]\npattern = \"9xxx\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.filter.pattern.as_deref(), Some("9xxx"));
    }
}
