//! # RpmDocs Extraction Pipeline (`pipeline`)
//!
//! File: cli/src/pipeline/mod.rs
//!
//! ## Overview
//!
//! Turns a directory of RPM archives into a tree of documentation files keyed
//! by archive name. Each archive goes through three stages in order:
//!
//! 1. **unpack** (`unpack`): decode the archive into `<scratch_root>/<name>`.
//! 2. **collect** (`collect`): select files under the documentation patterns
//!    and attach them to the archive's `ArchiveRecord` (`record`).
//! 3. **relocate** (`relocate`): move them to `<output_root>/<name>/<rel>`.
//!
//! `dispatch` discovers the archives, partitions them across execution units
//! and runs `process_archive` for every record, collecting one
//! `ArchiveOutcome` per archive into a `RunReport`.
//!
pub mod collect;
pub mod dispatch;
pub mod record;
pub mod relocate;
pub mod unpack;

use crate::common::fs::scratch::ScratchDir;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use collect::{collect_documents, compile_patterns, DocPattern};
use record::ArchiveRecord;
use relocate::relocate_documents;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use unpack::Unpacker;

/// Everything a partition job needs to process its archives.
pub struct PipelineContext {
    pub scratch_root: PathBuf,
    pub output_root: PathBuf,
    pub keep_scratch: bool,
    pub patterns: Vec<DocPattern>,
    pub unpacker: Arc<dyn Unpacker>,
}

impl PipelineContext {
    pub fn new(config: &Config, unpacker: Arc<dyn Unpacker>) -> Self {
        Self {
            scratch_root: config.paths.scratch_root.clone(),
            output_root: config.paths.output_root.clone(),
            keep_scratch: config.paths.keep_scratch,
            patterns: compile_patterns(&config.collect.patterns),
            unpacker,
        }
    }
}

/// The result of running the pipeline for one archive.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub name: String,
    /// Number of relocated documents, or why the archive failed.
    pub result: Result<usize>,
}

/// Runs unpack, collect and relocate for one archive.
///
/// Records whose name is not a plain directory component are rejected
/// before anything under the scratch or output roots is touched.
///
/// The scratch directory is removed when this returns, successful or not,
/// unless the context keeps scratch trees.
pub fn process_archive(mut record: ArchiveRecord, ctx: &PipelineContext) -> Result<usize> {
    record.ensure_usable_name()?;
    let scratch = ScratchDir::acquire(ctx.scratch_root.join(record.name()), ctx.keep_scratch)?;

    ctx.unpacker
        .unpack(record.source_path(), scratch.path())
        .with_context(|| format!("Failed to unpack {:?}", record.source_path()))?;

    collect_documents(&mut record, scratch.path(), &ctx.patterns)?;

    let destination = ctx.output_root.join(record.name());
    let relocated = relocate_documents(&record, scratch.path(), &destination)?;

    info!(
        "'{}': relocated {} documents into {:?}",
        record.name(),
        relocated.len(),
        destination
    );
    Ok(relocated.len())
}
