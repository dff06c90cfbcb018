use crate::domain::model::ComposeFile;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Finds compose files under a root directory.
pub trait DocumentLocator: Send + Sync {
    fn locate(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Reads and parses one compose file.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<ComposeFile>;
}

pub trait ConfigProvider: Send + Sync {
    fn directory(&self) -> &str;
    fn pattern(&self) -> &str;
    fn file_prefix(&self) -> &str;
    fn extensions(&self) -> &[String];
    fn exclude_dirs(&self) -> &[String];
}
