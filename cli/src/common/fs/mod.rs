//! # WizGen Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared across the engine and commands. Callers import the
//! submodule they need, e.g. `crate::common::fs::io::ensure_dir_exists`.
//!

/// Directory creation and whole-file read/write helpers.
pub mod io;
