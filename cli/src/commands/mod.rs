//! # WizGen Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Aggregates the command groups of the WizGen CLI so `main.rs` can route to
//! them. Each group defines its own arguments structure and a synchronous
//! handler function.
//!
//! ## Command Groups
//!
//! - `project`: scaffold projects, inspect their build configurations, and
//!   list template sets
//!

/// Command group for project scaffolding. Includes subcommands `new`, `config`, `list`.
pub mod project;
