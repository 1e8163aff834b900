//! # Scoped Scratch Directories
//!
//! File: cli/src/common/fs/scratch.rs
//!
//! `ScratchDir` owns one archive's extraction directory for the duration of its
//! pipeline. Acquiring it clears whatever an earlier run left at that path, so
//! a stale tree never leaks documents into the new one. Dropping it removes the
//! directory unless it was acquired with `keep = true`.
//!
use crate::common::fs::io::ensure_dir_exists;
use crate::core::error::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
}

impl ScratchDir {
    /// Creates an empty directory at `path`, removing prior contents.
    pub fn acquire(path: PathBuf, keep: bool) -> Result<Self> {
        if path.exists() {
            debug!("Clearing stale scratch directory {:?}", path);
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to clear scratch directory {:?}", path))?;
        }
        ensure_dir_exists(&path)?;
        Ok(Self { path, keep })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            debug!("Keeping scratch directory {:?}", self.path);
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove scratch directory {:?}: {}", self.path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_removed_on_drop() -> Result<()> {
        let base = tempdir()?;
        let path = base.path().join("extracted/rpms/foo");
        {
            let scratch = ScratchDir::acquire(path.clone(), false)?;
            fs::write(scratch.path().join("file"), "x")?;
            assert!(path.is_dir());
        }
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_kept_when_requested() -> Result<()> {
        let base = tempdir()?;
        let path = base.path().join("foo");
        drop(ScratchDir::acquire(path.clone(), true)?);
        assert!(path.is_dir());
        Ok(())
    }

    #[test]
    fn test_acquire_clears_stale_tree() -> Result<()> {
        let base = tempdir()?;
        let path = base.path().join("foo");
        fs::create_dir_all(path.join("usr/share/doc"))?;
        fs::write(path.join("usr/share/doc/OLD"), "stale")?;

        let scratch = ScratchDir::acquire(path.clone(), true)?;
        assert!(scratch.path().is_dir());
        assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }
}
