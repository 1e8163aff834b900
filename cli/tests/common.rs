//! # RpmDocs Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and runs the compiled `rpmdocs` binary through
//! `assert_cmd`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns a `Command` for the `rpmdocs` binary built for this test run.
pub fn rpmdocs_cmd() -> Command {
    Command::cargo_bin("rpmdocs").expect("Failed to find rpmdocs binary for testing")
}

/// Writes an executable stand-in for `cpio` into `dir`.
///
/// It reads the piped "archive" as a list of relative paths and creates each
/// one as a file under the `-D` destination, so a test archive is just a text
/// file naming the entries it contains.
#[cfg(unix)]
pub fn fake_extractor(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-cpio");
    fs::write(
        &script,
        r#"#!/bin/sh
dest="$2"
while IFS= read -r entry || [ -n "$entry" ]; do
  [ -n "$entry" ] || continue
  mkdir -p "$dest/$(dirname "$entry")"
  printf '%s\n' "$entry" > "$dest/$entry"
done
"#,
    )
    .expect("write fake extractor");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
        .expect("make fake extractor executable");
    script
}

/// Writes a config file pointing every root into `dir`.
pub fn write_config(dir: &Path, converter: &str, extractor: &Path, workers: usize) -> PathBuf {
    let path = dir.join("rpmdocs.toml");
    let content = format!(
        "[paths]\n\
         input_root = '{input}'\n\
         scratch_root = '{scratch}'\n\
         output_root = '{output}'\n\
         \n\
         [decode]\n\
         converter = '{converter}'\n\
         extractor = '{extractor}'\n\
         \n\
         [dispatch]\n\
         workers = {workers}\n",
        input = dir.join("rpms").display(),
        scratch = dir.join("extracted/rpms").display(),
        output = dir.join("extracted/manpages").display(),
        converter = converter,
        extractor = extractor.display(),
        workers = workers,
    );
    fs::write(&path, content).expect("write config");
    path
}

/// Writes a listing-archive `rpms/<file>` containing `entries`.
pub fn write_archive(dir: &Path, file: &str, entries: &[&str]) {
    let input = dir.join("rpms");
    fs::create_dir_all(&input).expect("create input root");
    fs::write(input.join(file), entries.join("\n")).expect("write archive");
}
