use crate::domain::model::ComposeFile;
use crate::domain::ports::DocumentLoader;
use crate::utils::error::{GrabError, Result};
use async_trait::async_trait;
use serde_yaml::Value;
use std::path::Path;

/// Parses compose YAML. Empty and comment-only files are empty documents;
/// `<<` merge keys are expanded before the services are read.
pub fn parse_compose(path: &Path, content: &str) -> Result<ComposeFile> {
    let invalid = |source: serde_yaml::Error| GrabError::DocumentInvalid {
        path: path.to_path_buf(),
        source,
    };

    if !has_content(content) {
        return Ok(ComposeFile::default());
    }

    let mut value: Value = serde_yaml::from_str(content).map_err(invalid)?;
    if value.is_null() {
        return Ok(ComposeFile::default());
    }
    value.apply_merge().map_err(invalid)?;

    serde_yaml::from_value(value).map_err(invalid)
}

fn has_content(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}

#[derive(Debug, Clone, Default)]
pub struct YamlLoader;

impl YamlLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for YamlLoader {
    async fn load(&self, path: &Path) -> Result<ComposeFile> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| GrabError::DocumentUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        parse_compose(path, &content)
    }
}
