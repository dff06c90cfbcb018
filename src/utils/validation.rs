use crate::utils::error::{GrabError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GrabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GrabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GrabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Extensions are compared without their leading dot, so both `yml` and
/// `.yml` are accepted here.
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(GrabError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for extension in extensions {
        let bare = extension.strip_prefix('.').unwrap_or(extension);
        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GrabError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Extensions may only contain letters and digits".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("discovery.directory", ".").is_ok());
        assert!(validate_path("discovery.directory", "").is_err());
        assert!(validate_path("discovery.directory", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_extensions() {
        let ok = vec!["yml".to_string(), ".yaml".to_string()];
        assert!(validate_extensions("discovery.extensions", &ok).is_ok());

        assert!(validate_extensions("discovery.extensions", &[]).is_err());
        assert!(validate_extensions("discovery.extensions", &[".".to_string()]).is_err());
        assert!(validate_extensions("discovery.extensions", &["y*ml".to_string()]).is_err());
    }
}
