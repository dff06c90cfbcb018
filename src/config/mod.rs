pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_extensions, validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_DIRECTORY: &str = ".";
pub const DEFAULT_FILE_PREFIX: &str = "docker-compose";
pub const DEFAULT_CONFIG_FILE: &str = "port-grab.toml";

pub fn default_extensions() -> Vec<String> {
    vec!["yml".to_string()]
}

pub fn default_exclude_dirs() -> Vec<String> {
    vec![".git".to_string(), "node_modules".to_string()]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "port-grab", version)]
#[command(about = "Find the next available host ports declared across docker-compose files")]
pub struct CliConfig {
    /// Find docker-compose files in this directory [default: .]
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Only show next ports matching this shape, e.g. 80xx
    #[arg(short, long)]
    pub port: Option<String>,

    /// TOML configuration file [default: ./port-grab.toml when present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Effective settings after layering CLI flags over the config file over the
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub directory: String,
    pub pattern: String,
    pub file_prefix: String,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub format: OutputFormat,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DIRECTORY.to_string(),
            pattern: String::new(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            format: OutputFormat::default(),
            verbose: false,
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_file(file: &TomlConfig) -> Self {
        let defaults = Self::default();
        let discovery = &file.discovery;
        Self {
            directory: discovery.directory.clone().unwrap_or(defaults.directory),
            pattern: file.filter.pattern.clone().unwrap_or(defaults.pattern),
            file_prefix: discovery.file_prefix.clone().unwrap_or(defaults.file_prefix),
            extensions: discovery.extensions.clone().unwrap_or(defaults.extensions),
            exclude_dirs: discovery.exclude_dirs.clone().unwrap_or(defaults.exclude_dirs),
            format: file.output.format.unwrap_or(defaults.format),
            verbose: file.logging.verbose.unwrap_or(defaults.verbose),
            json_logs: file.logging.json.unwrap_or(defaults.json_logs),
        }
    }

    #[cfg(feature = "cli")]
    pub fn with_cli(mut self, cli: &CliConfig) -> Self {
        if let Some(directory) = &cli.directory {
            self.directory = directory.clone();
        }
        if let Some(port) = &cli.port {
            self.pattern = port.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        self.verbose |= cli.verbose;
        self.json_logs |= cli.json_logs;
        self
    }

    /// Reads the config file named on the command line, or the default one
    /// when it exists, and layers the CLI flags on top.
    #[cfg(feature = "cli")]
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(TomlConfig::from_file(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };

        let base = file.as_ref().map(Self::from_file).unwrap_or_default();
        Ok(base.with_cli(cli))
    }

    pub fn directory_path(&self) -> &Path {
        Path::new(&self.directory)
    }
}

impl ConfigProvider for Settings {
    fn directory(&self) -> &str {
        &self.directory
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn exclude_dirs(&self) -> &[String] {
        &self.exclude_dirs
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("discovery.directory", &self.directory)?;
        validate_non_empty_string("discovery.file_prefix", &self.file_prefix)?;
        validate_extensions("discovery.extensions", &self.extensions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.directory(), ".");
        assert_eq!(settings.pattern(), "");
        assert_eq!(settings.file_prefix(), "docker-compose");
        assert_eq!(settings.extensions(), &["yml".to_string()]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = TomlConfig::from_toml_str(
            "[discovery]\nextensions = [\"yaml\"]\n[filter]\npattern = \"9xxx\"\n",
        )
        .unwrap();

        let settings = Settings::from_file(&file);
        assert_eq!(settings.extensions, vec!["yaml".to_string()]);
        assert_eq!(settings.pattern, "9xxx");
        assert_eq!(settings.file_prefix, DEFAULT_FILE_PREFIX);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfig::from_toml_str(
            "[discovery]\ndirectory = \"/srv\"\n[filter]\npattern = \"9xxx\"\n",
        )
        .unwrap();
        let cli = CliConfig::parse_from(["port-grab", "--port", "80xx", "--format", "json"]);

        let settings = Settings::from_file(&file).with_cli(&cli);
        assert_eq!(settings.directory, "/srv");
        assert_eq!(settings.pattern, "80xx");
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_rejects_empty_extensions() {
        let settings = Settings {
            extensions: vec![],
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
