//! # RpmDocs Extraction Run Integration Tests
//!
//! File: cli/tests/run.rs
//!
//! Runs the binary end to end against temporary input, scratch and output
//! roots. `cat` stands in for `rpm2cpio` and a shell script for `cpio`
//! (see `common::fake_extractor`), so these tests only run on unix.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_extracts_docs_into_per_archive_trees() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_archive(
        root,
        "foo-1.0.rpm",
        &[
            "usr/share/doc/foo/README",
            "usr/share/man/man1/foo.1",
            "usr/bin/foo",
        ],
    );
    write_archive(
        root,
        "bar-2.1.rpm",
        &["usr/share/doc/bar/COPYING", "usr/share/doc-base/bar"],
    );
    let extractor = fake_extractor(root);
    let config = write_config(root, "cat", &extractor, 2);

    rpmdocs_cmd()
        .current_dir(root)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Splitting 2 archives across 2 units."))
        .stdout(predicate::str::contains(
            "Relocated 3 documents from 2 archives (0 failed).",
        ));

    let out = root.join("extracted/manpages");
    assert!(out.join("foo-1.0/usr/share/doc/foo/README").is_file());
    assert!(out.join("foo-1.0/usr/share/man/man1/foo.1").is_file());
    assert!(out.join("bar-2.1/usr/share/doc/bar/COPYING").is_file());
    assert!(!out.join("foo-1.0/usr/bin/foo").exists());
    assert!(!out.join("bar-2.1/usr/share/doc-base").exists());
    assert!(!root.join("extracted/rpms/foo-1.0").exists());
}

#[test]
fn test_keep_scratch_flag_retains_extraction_tree() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_archive(root, "foo.rpm", &["usr/share/doc/foo/README", "usr/bin/foo"]);
    let extractor = fake_extractor(root);
    let config = write_config(root, "cat", &extractor, 1);

    rpmdocs_cmd()
        .current_dir(root)
        .arg("--config")
        .arg(&config)
        .arg("--keep-scratch")
        .assert()
        .success();

    assert!(root.join("extracted/rpms/foo/usr/bin/foo").is_file());
    assert!(root
        .join("extracted/manpages/foo/usr/share/doc/foo/README")
        .is_file());
}

#[test]
fn test_decode_failure_is_reported_per_archive() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_archive(root, "broken.rpm", &["usr/share/doc/broken/README"]);
    let extractor = fake_extractor(root);
    // `false` accepts the archive argument and always fails.
    let config = write_config(root, "false", &extractor, 2);

    rpmdocs_cmd()
        .current_dir(root)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("(1 failed)"))
        .stderr(predicate::str::contains("broken:"))
        .stderr(predicate::str::contains("'false' exited with"));
}

#[test]
fn test_empty_input_root_succeeds() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("rpms")).unwrap();
    let extractor = fake_extractor(root);
    let config = write_config(root, "cat", &extractor, 3);

    rpmdocs_cmd()
        .current_dir(root)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Splitting 0 archives across 3 units."));
}

#[test]
fn test_missing_input_root_fails_run() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let extractor = fake_extractor(root);
    let config = write_config(root, "cat", &extractor, 1);

    rpmdocs_cmd()
        .current_dir(root)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input root"));
}
