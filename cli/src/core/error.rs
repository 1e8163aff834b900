//! # RpmDocs Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the extraction pipeline.
//!
//! ## Architecture
//!
//! The error system consists of three pieces:
//! - `ExtractError`: failures of one archive's pipeline (walk, relocation,
//!   record misuse, name collisions) and of configuration validation.
//! - `DecodeError`: failures of the external decode step (`rpm2cpio | cpio`).
//! - `Result<T>`: a type alias for `anyhow::Result<T>` for flexible propagation.
//!
//! Per-archive failures are carried as `anyhow::Error` inside an
//! `ArchiveOutcome`, so callers can still `downcast_ref` to the typed variants:
//!
//! ```rust
//! match outcome.result {
//!     Err(e) if e.downcast_ref::<DecodeError>().is_some() => { /* decode failed */ }
//!     Err(e) => { /* filesystem or other failure */ }
//!     Ok(count) => { /* relocated `count` documents */ }
//! }
//! ```
//!
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while processing a single archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to walk extraction tree {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Documents for '{name}' were already attached")]
    DocumentsAlreadyAttached { name: String },

    #[error("Documents for '{name}' have not been collected yet")]
    NotCollected { name: String },

    #[error("Document {path:?} is not inside extraction root {root:?}")]
    OutsideExtractionRoot { path: PathBuf, root: PathBuf },

    #[error("Document {path:?} no longer exists")]
    DocumentMissing { path: PathBuf },

    #[error("Failed to relocate {from:?} to {to:?}: {reason}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("Archive name '{name}' collides with {first:?}; skipping {skipped:?}")]
    NameCollision {
        name: String,
        first: PathBuf,
        skipped: PathBuf,
    },

    #[error("Archive {source_path:?} derives the unusable name '{name}'")]
    InvalidName { name: String, source_path: PathBuf },

    #[error("Partition job for '{name}' did not complete: {reason}")]
    JobFailed { name: String, reason: String },
}

/// Errors raised by an `Unpacker` while decoding an archive.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed while waiting on '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("Failed to prepare destination {dest:?}: {source}")]
    Destination {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decoding {archive:?} produced no files in {dest:?}")]
    EmptyOutput { archive: PathBuf, dest: PathBuf },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
