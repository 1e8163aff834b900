//! # RpmDocs Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges, expands and validates the settings that drive a run: where
//! archives are read from, where they are unpacked, where documents end up,
//! which paths count as documentation, which decode tools to run, and how many
//! execution units to fan out over.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file passed with `--config`
//! 2. Project-specific `.rpmdocs.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 3. User-specific `<config dir>/rpmdocs/config.toml`
//! 4. Default values defined in the code
//!
//! An explicit file replaces sources 2 and 3. Otherwise the project file is
//! merged field by field over the user file. Paths have `~` expanded and the
//! result is validated before use.
//!
//! ## Example
//!
//! ```toml
//! [paths]
//! input_root = "~/mirror/rpms"
//! output_root = "docs"
//!
//! [collect]
//! patterns = ["/usr/share/doc", "/usr/share/man", "/usr/share/info"]
//!
//! [dispatch]
//! workers = 4
//! ```
//!
use crate::core::error::{ExtractError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Directory roots used by the pipeline.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Every direct entry of this directory is treated as one archive.
    #[serde(default = "default_input_root")]
    pub input_root: PathBuf,
    /// Per-archive extraction trees live in `<scratch_root>/<name>`.
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,
    /// Relocated documents land in `<output_root>/<name>`.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Leave extraction trees on disk after relocation.
    #[serde(default)]
    pub keep_scratch: bool,
}

/// Document selection settings.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CollectConfig {
    /// Path fragments marking documentation areas, matched on component boundaries.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Suffix stripped once from each archive file name to derive its name.
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
}

/// External decode tools.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DecodeConfig {
    /// Converts the archive to a cpio stream on stdout.
    #[serde(default = "default_converter")]
    pub converter: String,
    /// Unpacks a cpio stream from stdin into the destination directory.
    #[serde(default = "default_extractor")]
    pub extractor: String,
    /// Pass `v` to the extractor. Its output is discarded either way.
    #[serde(default)]
    pub verbose: bool,
}

/// Work distribution settings.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Number of partitions. `None` or `0` uses every available CPU.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_root: default_input_root(),
            scratch_root: default_scratch_root(),
            output_root: default_output_root(),
            keep_scratch: false,
        }
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            archive_extension: default_archive_extension(),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            converter: default_converter(),
            extractor: default_extractor(),
            verbose: false,
        }
    }
}

impl DispatchConfig {
    /// Resolves the configured worker count, falling back to the CPU count.
    pub fn units(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }
}

fn default_input_root() -> PathBuf {
    PathBuf::from("rpms")
}
fn default_scratch_root() -> PathBuf {
    PathBuf::from("extracted/rpms")
}
fn default_output_root() -> PathBuf {
    PathBuf::from("extracted/manpages")
}
fn default_patterns() -> Vec<String> {
    vec!["/usr/share/doc".to_string(), "/usr/share/man".to_string()]
}
fn default_archive_extension() -> String {
    ".rpm".to_string()
}
fn default_converter() -> String {
    "rpm2cpio".to_string()
}
fn default_extractor() -> String {
    "cpio".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".rpmdocs.toml";

/// Loads the effective configuration.
///
/// With `explicit` set, only that file (plus defaults) is used. Otherwise the
/// project file is layered over the user file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("", "", "rpmdocs") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    let pick_path = |p: PathBuf, u: PathBuf, default: PathBuf| if p != default { p } else { u };

    Config {
        paths: PathsConfig {
            input_root: pick_path(
                project.paths.input_root,
                user.paths.input_root,
                default_input_root(),
            ),
            scratch_root: pick_path(
                project.paths.scratch_root,
                user.paths.scratch_root,
                default_scratch_root(),
            ),
            output_root: pick_path(
                project.paths.output_root,
                user.paths.output_root,
                default_output_root(),
            ),
            keep_scratch: project.paths.keep_scratch || user.paths.keep_scratch,
        },
        collect: CollectConfig {
            patterns: if project.collect.patterns != default_patterns() {
                project.collect.patterns
            } else {
                user.collect.patterns
            },
            archive_extension: if project.collect.archive_extension != default_archive_extension()
            {
                project.collect.archive_extension
            } else {
                user.collect.archive_extension
            },
        },
        decode: DecodeConfig {
            converter: if project.decode.converter != default_converter() {
                project.decode.converter
            } else {
                user.decode.converter
            },
            extractor: if project.decode.extractor != default_extractor() {
                project.decode.extractor
            } else {
                user.decode.extractor
            },
            verbose: project.decode.verbose || user.decode.verbose,
        },
        dispatch: DispatchConfig {
            workers: project.dispatch.workers.or(user.dispatch.workers),
        },
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

fn expand_config_paths(config: &mut Config) {
    config.paths.input_root = expand_path(&config.paths.input_root);
    config.paths.scratch_root = expand_path(&config.paths.scratch_root);
    config.paths.output_root = expand_path(&config.paths.output_root);
    debug!("Expanded roots: {:?}", config.paths);
}

fn validate_config(config: &Config) -> Result<()> {
    if config.collect.patterns.is_empty() {
        return Err(anyhow!(ExtractError::Config(
            "At least one documentation pattern is required.".to_string()
        )));
    }
    if let Some(bad) = config
        .collect
        .patterns
        .iter()
        .find(|p| p.trim_matches('/').trim().is_empty())
    {
        return Err(anyhow!(ExtractError::Config(format!(
            "Documentation pattern '{}' names no path component.",
            bad
        ))));
    }
    if config.collect.archive_extension.is_empty() {
        return Err(anyhow!(ExtractError::Config(
            "Archive extension cannot be empty.".to_string()
        )));
    }
    let paths = &config.paths;
    if paths.input_root == paths.scratch_root || paths.input_root == paths.output_root {
        return Err(anyhow!(ExtractError::Config(format!(
            "Input root '{}' must differ from the scratch and output roots.",
            paths.input_root.display()
        ))));
    }
    if paths.scratch_root.starts_with(&paths.output_root)
        || paths.output_root.starts_with(&paths.scratch_root)
    {
        return Err(anyhow!(ExtractError::Config(format!(
            "Scratch root '{}' and output root '{}' must not be the same or nested.",
            paths.scratch_root.display(),
            paths.output_root.display()
        ))));
    }
    if config.decode.converter.is_empty() || config.decode.extractor.is_empty() {
        return Err(anyhow!(ExtractError::Config(
            "Decode converter and extractor must be set.".to_string()
        )));
    }
    Ok(())
}
