//! # Archive Records
//!
//! File: cli/src/pipeline/record.rs
//!
//! One `ArchiveRecord` exists per input archive. It carries the derived name
//! used as namespace key under both the scratch and output roots, the path of
//! the archive file, and, once collection ran, the discovered documents.
//!
use crate::core::error::ExtractError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    name: String,
    source_path: PathBuf,
    documents: Option<Vec<PathBuf>>,
}

impl ArchiveRecord {
    /// Builds a record from a raw archive file name.
    ///
    /// Only the last path component of `file_name` is used. `extension` is
    /// removed once from its end; a name without that suffix is kept whole.
    pub fn new(file_name: &Path, input_root: &Path, extension: &str) -> Self {
        let raw = file_name.file_name().unwrap_or_default();
        let base = raw.to_string_lossy();
        let name = match base.strip_suffix(extension) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => base.clone().into_owned(),
        };
        Self {
            name,
            source_path: input_root.join(raw),
            documents: None,
        }
    }

    /// Fails when the name cannot serve as a single directory component
    /// under the scratch and output roots (`.`, `..`, empty, or containing
    /// a separator).
    pub fn ensure_usable_name(&self) -> Result<(), ExtractError> {
        let usable = !matches!(self.name.as_str(), "" | "." | "..")
            && !self.name.contains(['/', '\\']);
        if usable {
            Ok(())
        } else {
            Err(ExtractError::InvalidName {
                name: self.name.clone(),
                source_path: self.source_path.clone(),
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Documents attached by the collector, or `None` before collection.
    pub fn documents(&self) -> Option<&[PathBuf]> {
        self.documents.as_deref()
    }

    /// Attaches the collector's result. Allowed once per record.
    pub fn attach_documents(&mut self, documents: Vec<PathBuf>) -> Result<(), ExtractError> {
        if self.documents.is_some() {
            return Err(ExtractError::DocumentsAlreadyAttached {
                name: self.name.clone(),
            });
        }
        self.documents = Some(documents);
        Ok(())
    }
}
