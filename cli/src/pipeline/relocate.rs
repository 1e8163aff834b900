//! # Document Relocation
//!
//! File: cli/src/pipeline/relocate.rs
//!
//! Moves collected documents out of an extraction tree into the permanent
//! per-archive output tree. A document at `<scratch_root>/<name>/<rel>` ends
//! up at `<output_root>/<name>/<rel>`, where `<rel>` is its location relative
//! to the package root (e.g. `usr/share/man/man1/foo.1`).
//!
//! Documents are moved, not copied, so the extraction tree loses them.
//! Relocating the same record twice therefore fails with
//! `ExtractError::DocumentMissing` on the first document and leaves the
//! earlier results in place.
//!
use crate::common::fs::io::{ensure_dir_exists, move_file};
use crate::core::error::ExtractError;
use crate::pipeline::record::ArchiveRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Computes where a document lands under `destination_root`.
pub fn destination_for(
    document: &Path,
    extraction_root: &Path,
    destination_root: &Path,
) -> Result<PathBuf, ExtractError> {
    let relative = document
        .strip_prefix(extraction_root)
        .map_err(|_| ExtractError::OutsideExtractionRoot {
            path: document.to_path_buf(),
            root: extraction_root.to_path_buf(),
        })?;
    Ok(destination_root.join(relative))
}

/// Moves every document of `record` from `extraction_root` into
/// `destination_root`, creating parent directories as needed.
///
/// Returns the final paths in document order. Stops at the first failure.
pub fn relocate_documents(
    record: &ArchiveRecord,
    extraction_root: &Path,
    destination_root: &Path,
) -> Result<Vec<PathBuf>, ExtractError> {
    let documents = record.documents().ok_or_else(|| ExtractError::NotCollected {
        name: record.name().to_string(),
    })?;

    let mut relocated = Vec::with_capacity(documents.len());
    for document in documents {
        let target = destination_for(document, extraction_root, destination_root)?;
        if !document.exists() {
            return Err(ExtractError::DocumentMissing {
                path: document.clone(),
            });
        }
        let relocate_err = |e: anyhow::Error| ExtractError::Relocate {
            from: document.clone(),
            to: target.clone(),
            reason: format!("{:#}", e),
        };
        if let Some(parent) = target.parent() {
            ensure_dir_exists(parent).map_err(relocate_err)?;
        }
        move_file(document, &target).map_err(relocate_err)?;
        debug!("Relocated {:?} -> {:?}", document, target);
        relocated.push(target);
    }
    Ok(relocated)
}
