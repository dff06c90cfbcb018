use crate::domain::ports::{ConfigProvider, DocumentLocator};
use crate::utils::error::{GrabError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What the walk does after visiting an entry.
#[derive(Debug)]
pub enum Visit {
    Continue,
    /// Do not descend into the directory just visited.
    SkipSubtree,
    Abort(GrabError),
}

pub trait WalkVisitor {
    fn visit_entry(&mut self, entry: &DirEntry) -> Visit;
    fn visit_error(&mut self, error: walkdir::Error) -> Visit;
}

/// Walks `root` in file name order, letting the visitor steer.
pub fn walk<V: WalkVisitor>(root: &Path, visitor: &mut V) -> Result<()> {
    let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(next) = entries.next() {
        let is_dir = next.as_ref().is_ok_and(|entry| entry.file_type().is_dir());
        let visit = match next {
            Ok(entry) => visitor.visit_entry(&entry),
            Err(error) => visitor.visit_error(error),
        };

        match visit {
            Visit::Continue => {}
            Visit::SkipSubtree if is_dir => entries.skip_current_dir(),
            Visit::SkipSubtree => {}
            Visit::Abort(error) => return Err(error),
        }
    }

    Ok(())
}

/// Collects compose files: name starts with the prefix and the extension is
/// one of the configured ones.
#[derive(Debug)]
pub struct ComposeFileCollector<'a> {
    file_prefix: &'a str,
    extensions: &'a [String],
    exclude_dirs: &'a [String],
    found: Vec<PathBuf>,
    skipped: usize,
}

impl<'a> ComposeFileCollector<'a> {
    pub fn new(file_prefix: &'a str, extensions: &'a [String], exclude_dirs: &'a [String]) -> Self {
        Self {
            file_prefix,
            extensions,
            exclude_dirs,
            found: Vec::new(),
            skipped: 0,
        }
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.found
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn is_compose_file(&self, name: &str, path: &Path) -> bool {
        if !name.starts_with(self.file_prefix) {
            return false;
        }
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.strip_prefix('.').unwrap_or(allowed) == extension)
    }
}

impl WalkVisitor for ComposeFileCollector<'_> {
    fn visit_entry(&mut self, entry: &DirEntry) -> Visit {
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            if entry.depth() > 0 && self.exclude_dirs.iter().any(|d| d.as_str() == name) {
                tracing::debug!("Skipping excluded directory {}", entry.path().display());
                return Visit::SkipSubtree;
            }
            return Visit::Continue;
        }

        if self.is_compose_file(&name, entry.path()) {
            self.found.push(entry.path().to_path_buf());
        }
        Visit::Continue
    }

    fn visit_error(&mut self, error: walkdir::Error) -> Visit {
        if is_permission_denied(&error) {
            self.skipped += 1;
            tracing::warn!("Skipping unreadable path: {}", error);
            return Visit::Continue;
        }

        let path = error.path().map(Path::to_path_buf).unwrap_or_default();
        Visit::Abort(GrabError::DirectoryWalk {
            path,
            message: error.to_string(),
        })
    }
}

fn is_permission_denied(error: &walkdir::Error) -> bool {
    error
        .io_error()
        .is_some_and(|io| io.kind() == ErrorKind::PermissionDenied)
}

/// Filesystem locator for compose files.
#[derive(Debug, Clone)]
pub struct FsLocator {
    file_prefix: String,
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl FsLocator {
    pub fn new(file_prefix: impl Into<String>, extensions: Vec<String>, exclude_dirs: Vec<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            extensions,
            exclude_dirs,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.file_prefix(),
            config.extensions().to_vec(),
            config.exclude_dirs().to_vec(),
        )
    }
}

impl Default for FsLocator {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_FILE_PREFIX,
            crate::config::default_extensions(),
            crate::config::default_exclude_dirs(),
        )
    }
}

impl DocumentLocator for FsLocator {
    fn locate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        // Anything but a missing root is left to the walk, which skips what it
        // is not allowed to read.
        if let Err(e) = std::fs::metadata(root) {
            if e.kind() == ErrorKind::NotFound {
                return Err(GrabError::RootNotFound {
                    path: root.to_path_buf(),
                });
            }
            tracing::debug!("Cannot stat {}: {}", root.display(), e);
        }

        let mut collector =
            ComposeFileCollector::new(&self.file_prefix, &self.extensions, &self.exclude_dirs);
        walk(root, &mut collector)?;

        if collector.skipped() > 0 {
            tracing::info!("{} unreadable paths were skipped", collector.skipped());
        }
        Ok(collector.into_paths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct StopAtFirstFile {
        visited: usize,
    }

    impl WalkVisitor for StopAtFirstFile {
        fn visit_entry(&mut self, entry: &DirEntry) -> Visit {
            self.visited += 1;
            if entry.file_type().is_file() {
                return Visit::Abort(GrabError::ConfigError {
                    message: "stop".to_string(),
                });
            }
            Visit::Continue
        }

        fn visit_error(&mut self, _error: walkdir::Error) -> Visit {
            Visit::Continue
        }
    }

    #[test]
    fn test_abort_stops_walk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let mut visitor = StopAtFirstFile { visited: 0 };
        let result = walk(dir.path(), &mut visitor);

        assert!(matches!(result, Err(GrabError::ConfigError { .. })));
        // root directory, then a.txt
        assert_eq!(visitor.visited, 2);
    }

    #[test]
    fn test_collector_matches_prefix_and_extension() {
        let extensions = vec!["yml".to_string(), ".yaml".to_string()];
        let collector = ComposeFileCollector::new("docker-compose", &extensions, &[]);

        assert!(collector.is_compose_file("docker-compose.yml", Path::new("docker-compose.yml")));
        assert!(collector.is_compose_file(
            "docker-compose.prod.yaml",
            Path::new("docker-compose.prod.yaml")
        ));
        assert!(!collector.is_compose_file("compose.yml", Path::new("compose.yml")));
        assert!(!collector.is_compose_file("docker-compose.json", Path::new("docker-compose.json")));
        assert!(!collector.is_compose_file("docker-compose", Path::new("docker-compose")));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = FsLocator::default().locate(&missing);
        assert!(matches!(result, Err(GrabError::RootNotFound { path }) if path == missing));
    }

    #[cfg(unix)]
    mod permissions {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Locks `dir` and reports whether the lock actually holds. It does
        /// not when running as root.
        fn lock(dir: &Path) -> bool {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
            if fs::read_dir(dir).is_ok() {
                unlock(dir);
                return false;
            }
            true
        }

        fn unlock(dir: &Path) {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
        }

        #[test]
        fn test_unreadable_subdirectory_is_skipped() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
            let locked = dir.path().join("locked");
            fs::create_dir(&locked).unwrap();
            fs::write(locked.join("docker-compose.yml"), "services: {}\n").unwrap();

            if !lock(&locked) {
                return;
            }
            let result = FsLocator::default().locate(dir.path());
            unlock(&locked);

            assert_eq!(result.unwrap(), vec![dir.path().join("docker-compose.yml")]);
        }

        #[test]
        fn test_root_behind_unreadable_parent_is_not_missing() {
            let dir = TempDir::new().unwrap();
            let locked = dir.path().join("locked");
            let root = locked.join("project");
            fs::create_dir_all(&root).unwrap();
            fs::write(root.join("docker-compose.yml"), "services: {}\n").unwrap();

            if !lock(&locked) {
                return;
            }
            let result = FsLocator::default().locate(&root);
            unlock(&locked);

            assert_eq!(result.unwrap(), Vec::<PathBuf>::new());
        }
    }
}
