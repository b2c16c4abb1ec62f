//! Bundled resource roots
//!
//! Transfer models and personal model archives are looked up by name in the
//! component's bundled resource root. The router only needs read access.

use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read-only source of bundled resources
pub trait AssetSource: Send + Sync + Debug {
    /// Name of this source (for logging)
    fn name(&self) -> &str;

    /// Load the named resource.
    ///
    /// Returns `Ok(None)` when the resource does not exist and `Err` only
    /// when it exists but cannot be read.
    fn load(&self, name: &str) -> io::Result<Option<Bytes>>;
}

/// Resources stored as files under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Serve resources from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Only plain relative names stay inside the root
fn is_contained(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl AssetSource for DirectoryAssets {
    fn name(&self) -> &str {
        "directory"
    }

    fn load(&self, name: &str) -> io::Result<Option<Bytes>> {
        if name.is_empty() || !is_contained(Path::new(name)) {
            return Ok(None);
        }
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // Directories and similar non-files count as missing
            Err(_) if path.is_dir() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resources held in memory, keyed by name
#[derive(Debug, Default)]
pub struct MemoryAssets {
    files: RwLock<HashMap<String, Bytes>>,
}

impl MemoryAssets {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.files.write().insert(name.into(), data.into());
    }

    /// Builder-style insert
    pub fn with(self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    /// Number of stored resources
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, name: &str) -> io::Result<Option<Bytes>> {
        Ok(self.files.read().get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_assets_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("labels.txt"), b"cat\ndog\n").unwrap();
        let assets = DirectoryAssets::new(dir.path());

        let data = assets.load("labels.txt").unwrap().unwrap();
        assert_eq!(&data[..], b"cat\ndog\n");
        assert!(assets.load("missing.txt").unwrap().is_none());
    }

    #[test]
    fn test_directory_is_not_an_asset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("models")).unwrap();
        let assets = DirectoryAssets::new(dir.path());

        assert!(assets.load("models").unwrap().is_none());
        assert!(assets.load("").unwrap().is_none());
    }

    #[test]
    fn test_directory_assets_stay_inside_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("assets");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("private.zip"), b"secret").unwrap();
        std::fs::write(root.join("labels.txt"), b"cat\n").unwrap();
        let assets = DirectoryAssets::new(&root);

        assert!(assets.load("../private.zip").unwrap().is_none());
        assert!(assets.load("models/../../private.zip").unwrap().is_none());
        let absolute = outer.path().join("private.zip");
        assert!(assets.load(absolute.to_str().unwrap()).unwrap().is_none());
        assert!(assets.load("./labels.txt").unwrap().is_some());
    }

    #[test]
    fn test_memory_assets() {
        let assets = MemoryAssets::new().with("model.json", &b"{}"[..]);
        assert_eq!(assets.len(), 1);
        assert_eq!(&assets.load("model.json").unwrap().unwrap()[..], b"{}");
        assert!(assets.load("other").unwrap().is_none());
    }
}
