//! # Archive Unpacking
//!
//! File: cli/src/pipeline/unpack.rs
//!
//! ## Overview
//!
//! Materializes an archive's file tree on disk. The archive format itself is
//! never parsed here: decoding is delegated to external tools behind the
//! `Unpacker` trait, and only the resulting directory tree matters to the
//! later stages.
//!
//! ## Architecture
//!
//! - **`Unpacker`**: the injectable capability, shared across partition jobs
//!   as `Arc<dyn Unpacker>`.
//! - **`RpmCpioUnpacker`**: runs `rpm2cpio <archive> | cpio -D <dest> -idm`,
//!   preserving the relative paths recorded in the archive. `cpio` creates
//!   intermediate directories itself (`-d`) and keeps modification times (`-m`).
//!
//! After both tools exit successfully the destination must contain at least
//! one entry; an empty tree is reported as `DecodeError::EmptyOutput` instead
//! of silently producing a record with zero documents.
//!
use crate::common::process::run_piped;
use crate::core::config::DecodeConfig;
use crate::core::error::DecodeError;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Decodes one archive into a destination directory.
pub trait Unpacker: Send + Sync {
    /// Populates `dest` with the contents of `archive`. `dest` need not exist.
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), DecodeError>;
}

/// `rpm2cpio | cpio` decoder.
#[derive(Debug, Clone)]
pub struct RpmCpioUnpacker {
    converter: String,
    extractor: String,
    verbose: bool,
}

impl RpmCpioUnpacker {
    pub fn new(config: &DecodeConfig) -> Self {
        Self {
            converter: config.converter.clone(),
            extractor: config.extractor.clone(),
            verbose: config.verbose,
        }
    }

    fn extractor_flags(&self) -> &'static str {
        if self.verbose {
            "-idmv"
        } else {
            "-idm"
        }
    }
}

impl Unpacker for RpmCpioUnpacker {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), DecodeError> {
        fs::create_dir_all(dest).map_err(|source| DecodeError::Destination {
            dest: dest.to_path_buf(),
            source,
        })?;

        let mut converter = Command::new(&self.converter);
        converter.arg(archive);
        let mut extractor = Command::new(&self.extractor);
        extractor.arg("-D").arg(dest).arg(self.extractor_flags());

        run_piped(converter, extractor)?;

        let populated = fs::read_dir(dest)
            .map_err(|source| DecodeError::Destination {
                dest: dest.to_path_buf(),
                source,
            })?
            .next()
            .is_some();
        if !populated {
            return Err(DecodeError::EmptyOutput {
                archive: archive.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        debug!("Unpacked {:?} into {:?}", archive, dest);
        Ok(())
    }
}
