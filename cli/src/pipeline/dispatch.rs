//! # Work Dispatch
//!
//! File: cli/src/pipeline/dispatch.rs
//!
//! ## Overview
//!
//! Discovers the archives in the input root and runs the pipeline for all of
//! them, fanning out across the available execution units.
//!
//! ## Architecture
//!
//! - The input root's direct entries are listed and sorted by file name, and
//!   one `ArchiveRecord` is built per entry.
//! - Records whose derived name was already taken by an earlier record are
//!   not processed; each is reported as `ExtractError::NameCollision` so no
//!   archive silently overwrites another's scratch or output tree.
//! - A record whose name is `.`, `..` or otherwise not a single path
//!   component fails with `ExtractError::InvalidName` before its scratch
//!   directory is acquired (see `process_archive`).
//! - The remaining records are split by `partition` into one contiguous,
//!   balanced chunk per unit. Every non-empty chunk becomes its own
//!   `tokio::task::spawn_blocking` job that processes its archives one after
//!   another; the jobs run concurrently and are joined with `join_all`.
//! - Failures stay with their archive. A job that panics turns into a
//!   `JobFailed` outcome for each archive it owned.
//!
use crate::core::config::Config;
use crate::core::error::{ExtractError, Result};
use crate::pipeline::record::ArchiveRecord;
use crate::pipeline::unpack::Unpacker;
use crate::pipeline::{process_archive, ArchiveOutcome, PipelineContext};
use anyhow::Context;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Aggregated outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    /// Entries found in the input root, collisions included.
    pub archives: usize,
    /// Execution units the archives were partitioned over.
    pub units: usize,
    /// Partition jobs actually submitted (empty chunks are skipped).
    pub partitions: usize,
    pub outcomes: Vec<ArchiveOutcome>,
}

impl RunReport {
    pub fn documents_relocated(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &anyhow::Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Splits `items` into `n` contiguous chunks whose sizes differ by at most one.
///
/// The first `len % n` chunks get the extra item. `n == 0` is treated as 1.
pub fn partition<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let n = n.max(1);
    let (k, m) = (items.len() / n, items.len() % n);
    let mut rest = items.into_iter();
    (0..n)
        .map(|i| {
            let size = if i < m { k + 1 } else { k };
            rest.by_ref().take(size).collect()
        })
        .collect()
}

/// Lists the input root and builds one record per direct entry, sorted by name.
pub fn discover_archives(input_root: &Path, extension: &str) -> Result<Vec<ArchiveRecord>> {
    let mut names: Vec<PathBuf> = fs::read_dir(input_root)
        .with_context(|| format!("Failed to read input root {:?}", input_root))?
        .map(|entry| entry.map(|e| PathBuf::from(e.file_name())))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("Failed to list input root {:?}", input_root))?;
    names.sort();
    debug!("Discovered {} entries in {:?}", names.len(), input_root);
    Ok(names
        .iter()
        .map(|name| ArchiveRecord::new(name, input_root, extension))
        .collect())
}

/// Keeps the first record per derived name and reports the rest.
fn split_collisions(records: Vec<ArchiveRecord>) -> (Vec<ArchiveRecord>, Vec<ArchiveOutcome>) {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(records.len());
    let mut collisions = Vec::new();

    for record in records {
        match seen.get(record.name()) {
            Some(first) => {
                warn!(
                    "{:?} reduces to the same name as {:?} ('{}'); skipping it",
                    record.source_path(),
                    first,
                    record.name()
                );
                collisions.push(ArchiveOutcome {
                    name: record.name().to_string(),
                    result: Err(ExtractError::NameCollision {
                        name: record.name().to_string(),
                        first: first.clone(),
                        skipped: record.source_path().to_path_buf(),
                    }
                    .into()),
                });
            }
            None => {
                seen.insert(record.name().to_string(), record.source_path().to_path_buf());
                unique.push(record);
            }
        }
    }
    (unique, collisions)
}

fn process_partition(records: Vec<ArchiveRecord>, ctx: &PipelineContext) -> Vec<ArchiveOutcome> {
    records
        .into_iter()
        .map(|record| {
            let name = record.name().to_string();
            let result = process_archive(record, ctx);
            if let Err(e) = &result {
                error!("'{}' failed: {:#}", name, e);
            }
            ArchiveOutcome { name, result }
        })
        .collect()
}

/// Runs the pipeline for every archive under the configured input root.
///
/// Only a failure to list the input root fails the run as a whole; every
/// per-archive failure is returned inside the report.
pub async fn run(config: &Config, unpacker: Arc<dyn Unpacker>) -> Result<RunReport> {
    let records = discover_archives(
        &config.paths.input_root,
        &config.collect.archive_extension,
    )?;
    let archives = records.len();
    let units = config.dispatch.units();

    println!("Splitting {} archives across {} units.", archives, units);

    let (unique, mut outcomes) = split_collisions(records);
    let ctx = Arc::new(PipelineContext::new(config, unpacker));

    let jobs: Vec<_> = partition(unique, units)
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let names: Vec<String> = chunk.iter().map(|r| r.name().to_string()).collect();
            let ctx = Arc::clone(&ctx);
            let handle = tokio::task::spawn_blocking(move || process_partition(chunk, &ctx));
            async move {
                match handle.await {
                    Ok(batch) => batch,
                    Err(join_err) => {
                        let reason = join_err.to_string();
                        error!("Partition job failed: {}", reason);
                        names
                            .into_iter()
                            .map(|name| ArchiveOutcome {
                                result: Err(ExtractError::JobFailed {
                                    name: name.clone(),
                                    reason: reason.clone(),
                                }
                                .into()),
                                name,
                            })
                            .collect()
                    }
                }
            }
        })
        .collect();

    let partitions = jobs.len();
    info!("Submitted {} partition jobs", partitions);
    for batch in join_all(jobs).await {
        outcomes.extend(batch);
    }

    Ok(RunReport {
        archives,
        units,
        partitions,
        outcomes,
    })
}
