//! # RpmDocs Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that attach path context to failures:
//! - **`ensure_dir_exists`**: creates a directory and its parents (`mkdir -p`),
//!   rejecting a path that exists as something other than a directory.
//! - **`move_file`**: moves one file, overwriting the destination. A plain
//!   rename is tried first; when that fails while the source is still present
//!   (typically a move across filesystems) the move is done by `fs_extra`,
//!   which copies and then deletes the source.
//!
use crate::core::error::Result;
use anyhow::{bail, Context};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        debug!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        bail!("Path exists but is not a directory: {:?}", path);
    }
    Ok(())
}

/// Moves `from` to `to`, replacing any existing file at `to`.
///
/// The parent of `to` must already exist.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) if from.exists() => {
            debug!(
                "Rename {:?} -> {:?} failed ({}), falling back to copy and delete",
                from, to, rename_err
            );
            let mut options = fs_extra::file::CopyOptions::new();
            options.overwrite = true;
            fs_extra::file::move_file(from, to, &options)
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("Failed to move {:?} to {:?}", from, to))?;
            Ok(())
        }
        Err(rename_err) => {
            Err(rename_err).with_context(|| format!("Failed to move {:?} to {:?}", from, to))
        }
    }
}
