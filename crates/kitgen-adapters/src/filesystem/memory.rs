//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use kitgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::KitgenResult,
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without going through the port (testing helper).
    pub fn seed(&self, path: impl Into<PathBuf>, content: &str) {
        let mut inner = self.inner.write().unwrap();
        let path = path.into();
        if let Some(parent) = path.parent() {
            inner.directories.insert(parent.to_path_buf());
        }
        inner.files.insert(path, content.to_string());
    }

    /// Read a file's content (testing helper).
    pub fn file_content(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut files: Vec<PathBuf> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    pub fn file_count(&self) -> usize {
        self.inner.read().unwrap().files.len()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> KitgenResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> KitgenResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;

        // Mirror the real filesystem: the parent must exist first.
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KitgenResult<String> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

fn lock_error<T>(_: T) -> kitgen_core::error::KitgenError {
    kitgen_core::error::KitgenError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("a")).unwrap();
        fs.write_file(Path::new("a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("a/b.txt")).unwrap(), "x");
        assert!(fs.exists(Path::new("a/b.txt")));
        assert!(fs.exists(Path::new("a")));
    }

    #[test]
    fn seeded_files_are_visible_through_the_port() {
        let fs = MemoryFilesystem::new();
        fs.seed("out/Package.swift", "// keep me");
        assert!(fs.exists(Path::new("out/Package.swift")));
        assert_eq!(fs.file_count(), 1);
    }
}
