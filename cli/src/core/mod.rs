//! # WizGen Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational components shared by the scaffold engine and the commands:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error taxonomy and the crate-wide `Result` alias
//! - `templating`: Template rendering and the copy-only asset rule
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{WizardError, Result};
//! use crate::core::templating::TemplateRenderer;
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
