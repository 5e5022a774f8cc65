//! Path management for ~/.imageref/ directory structure

use crate::{ImageRefError, Result};
use std::path::{Path, PathBuf};

/// Manages paths for the local image index
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    /// Create a new StorePaths instance using the default root (~/.imageref/)
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            ImageRefError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine user home directory. Please ensure HOME environment variable is set.",
            ))
        })?;

        Ok(Self {
            root: home.join(format!(".{}", crate::APP_NAME)),
        })
    }

    /// Create a new StorePaths instance with a custom root
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Use `root` when given, the default location otherwise
    pub fn resolve(root: Option<&Path>) -> Result<Self> {
        match root {
            Some(root) => Ok(Self::with_root(root)),
            None => Self::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    /// Directory containing image data
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Image index file (maps image IDs to their tags)
    pub fn image_index(&self) -> PathBuf {
        self.images_dir().join("index.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_structure() {
        let tmp = TempDir::new().unwrap();
        let paths = StorePaths::with_root(tmp.path());

        assert_eq!(paths.root(), tmp.path());
        assert_eq!(paths.images_dir(), tmp.path().join("images"));
        assert_eq!(paths.image_index(), tmp.path().join("images/index.json"));
    }

    #[test]
    fn test_resolve_prefers_explicit_root() {
        let tmp = TempDir::new().unwrap();
        let paths = StorePaths::resolve(Some(tmp.path())).unwrap();
        assert_eq!(paths.root(), tmp.path());
    }

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().unwrap();
        let paths = StorePaths::with_root(tmp.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.images_dir().exists());
        assert!(!paths.image_index().exists());
    }
}
