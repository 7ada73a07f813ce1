//! # WizGen Scaffold Engine
//!
//! File: cli/src/scaffold/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn a `ProjectSpec` into files on disk plus a
//! structured `ScaffoldResult`:
//!
//! - `spec`: project kinds, flags, and the immutable project specification
//! - `manifest`: ordered template lists (`Templates.inf`, `BootDisk.inf`)
//! - `naming`: logical template name to target file name
//! - `build_config`: debug/release compiler and linker settings
//! - `boot_disk`: the optional boot-disk image project
//! - `orchestrator`: the staged scaffold sequence
//! - `persist`: the project store interface and its TOML implementation
//!
//! The engine is synchronous and touches only caller-supplied paths. Two
//! scaffolds aimed at the same destination must be serialized by the caller.
//!
pub mod boot_disk;
pub mod build_config;
pub mod manifest;
pub mod naming;
pub mod orchestrator;
pub mod persist;
pub mod spec;
