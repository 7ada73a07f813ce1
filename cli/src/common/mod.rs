//! # WizGen Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared, cross-cutting helpers that are neither command logic (`commands::`)
//! nor scaffold engine logic (`scaffold::`).
//!

/// Utilities for filesystem operations.
pub mod fs;
