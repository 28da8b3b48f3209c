//! Test fixtures for building throwaway file trees.
//!
//! # Usage
//!
//! ```ignore
//! use fsitem_config::testing::TestTree;
//!
//! let tree = TestTree::new()?;
//! let file = tree.write_file("sub/file.txt", b"hello")?;
//! tree.write_sidecar("sub/file.txt", &serde_json::json!({"k": "v"}))?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use fsitem::metadata::sidecar_path;

/// Temporary directory tree, removed on drop.
pub struct TestTree {
    _temp_dir: TempDir,
    /// Root of the tree
    pub root: PathBuf,
}

impl TestTree {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let root = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// Absolute path of `rel` inside the tree. Does not create anything.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: impl AsRef<Path>, contents: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `value` as the conventional sidecar of `rel`.
    pub fn write_sidecar(
        &self,
        rel: impl AsRef<Path>,
        value: &serde_json::Value,
    ) -> anyhow::Result<PathBuf> {
        let bytes = serde_json::to_vec(value)?;
        self.write_file(sidecar_path(rel), &bytes)
    }

    pub fn mkdir(&self, rel: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let path = self.path(rel);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(path)
    }

    /// Create a symlink at `rel` pointing at `target`, verbatim.
    #[cfg(unix)]
    pub fn symlink(&self, target: impl AsRef<Path>, rel: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let link = self.path(rel);
        std::os::unix::fs::symlink(target.as_ref(), &link)
            .with_context(|| format!("Failed to symlink {}", link.display()))?;
        Ok(link)
    }
}
