//! # Boot-Disk Project
//!
//! File: cli/src/scaffold/boot_disk.rs
//!
//! ## Overview
//!
//! When requested, a second project named `bootdisk` is created next to the
//! primary one (under `<project root>/bootdisk`). It compiles nothing. Its only
//! file is the boot list (`boot.lst`, from the `BootDisk.inf` manifest) and its
//! only build action is a custom build step per variant that runs the SDK's
//! `mkdfs` tool to assemble a bootable floppy image from the OS loader, the
//! kernel, and the primary project's output.
//!
//! ## Custom Build Step
//!
//! The command line uses host macros (`$(OutDir)`, `$(ProjectDir)`) so that both
//! variants share one command; the debug variant appends `-Kdebug` to boot the
//! kernel with debug options. Declared inputs and the declared output are
//! concrete per-variant paths relative to the boot-disk root.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use crate::core::templating::TemplateRenderer;
use crate::scaffold::build_config::{BuildConfigurations, Variant};
use crate::scaffold::manifest::{ManifestId, TemplateSet};
use crate::scaffold::naming;
use crate::scaffold::orchestrator::{project_file_name, render_manifest};
use crate::scaffold::spec::ProjectSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const BOOT_DISK_PROJECT_NAME: &str = "bootdisk";
pub const BOOT_LIST_FILE: &str = "boot.lst";
pub const BOOT_IMAGE_FILE: &str = "bootdisk.img";
pub const BUILD_STEP_DESCRIPTION: &str = "Building boot disk image";
/// Extra kernel option token passed only by the debug variant.
pub const DEBUG_KERNEL_OPTION: &str = "-Kdebug";
/// Floppy capacity in kilobytes.
const IMAGE_CAPACITY_KB: &str = "1440";

/// A custom build command attached to a project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBuildStep {
    pub description: String,
    /// Command line split into tokens.
    pub command: Vec<String>,
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

impl CustomBuildStep {
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// The secondary project that turns the primary output into a boot image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDiskProject {
    pub name: String,
    pub project_root: PathBuf,
    pub project_file: PathBuf,
    /// Created files, relative to `project_root`, in manifest order.
    pub files: Vec<PathBuf>,
    /// Name of the project whose output goes onto the disk.
    pub depends_on: String,
    pub debug: CustomBuildStep,
    pub release: CustomBuildStep,
}

impl BootDiskProject {
    pub fn step(&self, variant: Variant) -> &CustomBuildStep {
        match variant {
            Variant::Debug => &self.debug,
            Variant::Release => &self.release,
        }
    }
}

/// Root of the boot-disk project for a primary project rooted at `primary_root`.
pub fn boot_disk_root(primary_root: &Path) -> PathBuf {
    primary_root.join(BOOT_DISK_PROJECT_NAME)
}

/// Derives the custom build step of one variant. Pure.
pub fn build_step(
    spec: &ProjectSpec,
    configurations: &BuildConfigurations,
    variant: Variant,
) -> CustomBuildStep {
    let sdk = spec.sdk_path();
    let sdk_bin = sdk.join("bin");
    let boot_sector = sdk_bin.join("boot");
    let loader = sdk_bin.join("osldr.dll");
    let kernel = sdk_bin.join("krnl.dll");
    let mkdfs = sdk.join("tools").join("mkdfs");

    let mut command: Vec<String> = vec![
        mkdfs.display().to_string(),
        "-d".into(),
        format!("$(OutDir)/{}", BOOT_IMAGE_FILE),
        "-b".into(),
        boot_sector.display().to_string(),
        "-l".into(),
        loader.display().to_string(),
        "-k".into(),
        kernel.display().to_string(),
        "-c".into(),
        IMAGE_CAPACITY_KB.into(),
        "-i".into(),
        "-f".into(),
        "-S".into(),
        "$(ProjectDir)".into(),
        "-F".into(),
        BOOT_LIST_FILE.into(),
    ];
    if variant == Variant::Debug {
        command.push(DEBUG_KERNEL_OPTION.to_string());
    }

    // The primary project's outputs are relative to its root, one level up.
    let primary_output = Path::new("..").join(&configurations.get(variant).output_file);

    CustomBuildStep {
        description: BUILD_STEP_DESCRIPTION.to_string(),
        command,
        inputs: vec![
            primary_output,
            PathBuf::from(BOOT_LIST_FILE),
            boot_sector,
            loader,
            kernel,
        ],
        output: PathBuf::from(variant.as_str()).join(BOOT_IMAGE_FILE),
    }
}

/// Creates the boot-disk project directory, renders its manifest, and derives
/// both build steps.
pub fn scaffold_boot_disk(
    spec: &ProjectSpec,
    primary_root: &Path,
    configurations: &BuildConfigurations,
    templates: &TemplateSet,
    renderer: &TemplateRenderer,
) -> Result<BootDiskProject> {
    let root = boot_disk_root(primary_root);
    io::ensure_dir_exists(&root)?;

    let manifest = templates.load_manifest(ManifestId::BootDisk, renderer)?;
    let files = render_manifest(templates, &manifest, renderer, &root, |logical| {
        naming::resolve_for_project(logical, BOOT_DISK_PROJECT_NAME)
    })?;
    info!(
        "Boot-disk project created at {} ({} file(s))",
        root.display(),
        files.len()
    );

    Ok(BootDiskProject {
        name: BOOT_DISK_PROJECT_NAME.to_string(),
        project_file: root.join(project_file_name(BOOT_DISK_PROJECT_NAME)),
        project_root: root,
        files,
        depends_on: spec.name().to_string(),
        debug: build_step(spec, configurations, Variant::Debug),
        release: build_step(spec, configurations, Variant::Release),
    })
}
