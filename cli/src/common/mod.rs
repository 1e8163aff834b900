//! # RpmDocs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to any one pipeline stage:
//!
//! - **`fs`**: directory creation, file moves, and the scoped scratch directory.
//! - **`process`**: running two external programs joined by a pipe.
//!

/// Filesystem helpers (directory creation, moves, scratch directories).
pub mod fs;
/// Execution of piped external processes.
pub mod process;
