//! # RpmDocs Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Architecture
//!
//! - **`io`**: `ensure_dir_exists` and `move_file` (rename with a cross-device
//!   fallback through `fs_extra`). Used by the unpacker and the relocator.
//! - **`scratch`**: `ScratchDir`, the per-archive extraction directory that is
//!   removed when the archive's pipeline finishes unless told to keep it.
//!

pub mod io;
pub mod scratch;
