//! # WizGen CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every command
//! built here is isolated from the developer's own configuration: the user
//! config directory points into a scratch directory, and the template set and
//! SDK path come from environment overrides.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// SDK path handed to every scaffold. It does not need to exist.
pub const TEST_SDK: &str = "/opt/sanos";

/// Command for the compiled `wizgen` binary, without any isolation.
pub fn wizgen_cmd() -> Command {
    Command::cargo_bin("wizgen").expect("Failed to find wizgen binary for testing")
}

/// The template set shipped in the repository.
pub fn shipped_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("templates")
        .join("sanos")
}

/// `wizgen` running inside `workdir`, using `templates` and the test SDK.
pub fn isolated_cmd(workdir: &Path, templates: &Path) -> Command {
    let mut cmd = wizgen_cmd();
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env("WIZGEN_TEMPLATES_DIR", templates)
        .env("WIZGEN_SDK_PATH", TEST_SDK)
        .env_remove("RUST_LOG");
    cmd
}
