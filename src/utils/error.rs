use crate::core::normalize::HostPortError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrabError {
    #[error("Directory not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Failed to walk {}: {message}", path.display())]
    DirectoryWalk { path: PathBuf, message: String },

    #[error("Cannot read compose file {}: {source}", path.display())]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid compose file {}: {source}", path.display())]
    DocumentInvalid {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Service '{service}' in {} has a malformed ports field: {reason}", path.display())]
    MalformedPortsField {
        path: PathBuf,
        service: String,
        reason: String,
    },

    #[error("Invalid host port in '{entry}' ({origin}): {source}")]
    InvalidPortNumber {
        entry: String,
        origin: String,
        #[source]
        source: HostPortError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Discovery,
    Document,
    Ports,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GrabError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GrabError::RootNotFound { .. } | GrabError::DirectoryWalk { .. } => {
                ErrorCategory::Discovery
            }
            GrabError::DocumentUnreadable { .. } | GrabError::DocumentInvalid { .. } => {
                ErrorCategory::Document
            }
            GrabError::MalformedPortsField { .. } | GrabError::InvalidPortNumber { .. } => {
                ErrorCategory::Ports
            }
            GrabError::ConfigError { .. }
            | GrabError::MissingConfigError { .. }
            | GrabError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GrabError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Discovery | ErrorCategory::Document | ErrorCategory::Ports => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GrabError::RootNotFound { path } => {
                format!("The directory {} does not exist", path.display())
            }
            GrabError::DirectoryWalk { path, .. } => {
                format!("Could not scan {} for compose files", path.display())
            }
            GrabError::DocumentUnreadable { path, .. } => {
                format!("Could not read {}", path.display())
            }
            GrabError::DocumentInvalid { path, .. } => {
                format!("{} is not a valid compose file", path.display())
            }
            GrabError::MalformedPortsField { path, service, .. } => format!(
                "The ports of service '{}' in {} must be a list",
                service,
                path.display()
            ),
            GrabError::InvalidPortNumber { entry, origin, .. } => {
                format!("'{}' in {} is not a valid port mapping", entry, origin)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Discovery => "Check the --directory argument and its permissions",
            ErrorCategory::Document => "Fix the YAML syntax of the reported compose file",
            ErrorCategory::Ports => {
                "Use the short syntax: HOST:CONTAINER, IP:HOST:CONTAINER or START-END:START-END"
            }
            ErrorCategory::Configuration => "Review the command line flags and port-grab.toml",
            ErrorCategory::Output => "Check that stdout is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GrabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_are_high_severity() {
        let err = GrabError::MalformedPortsField {
            path: PathBuf::from("docker-compose.yml"),
            service: "web".to_string(),
            reason: "expected a sequence".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Ports);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("'web'"));
    }

    #[test]
    fn config_errors_are_medium_severity() {
        let err = GrabError::MissingConfigError {
            field: "discovery.directory".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn json_errors_are_critical_output_errors() {
        let err: GrabError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, GrabError::SerializationError(_)));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.recovery_suggestion(), "Check that stdout is writable");
    }
}
