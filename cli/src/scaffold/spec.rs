//! # Project Specification
//!
//! File: cli/src/scaffold/spec.rs
//!
//! ## Overview
//!
//! `ProjectSpec` is the immutable input to a scaffold: what kind of project to
//! create, where, against which SDK, and with which flags. It is built once from
//! caller input (command line plus configuration) and then only read.
//!
//! `ProjectSpec` also owns the placeholder values that templates are rendered
//! against, so every component receives the project's values explicitly rather
//! than through a shared lookup table.
//!
use crate::core::error::{Result, WizardError};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The kind of binary a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    Executable,
    DynamicLibrary,
    StaticLibrary,
    KernelDriver,
    KernelModule,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 5] = [
        ProjectKind::Executable,
        ProjectKind::DynamicLibrary,
        ProjectKind::StaticLibrary,
        ProjectKind::KernelDriver,
        ProjectKind::KernelModule,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::Executable => "executable",
            ProjectKind::DynamicLibrary => "dynamic-library",
            ProjectKind::StaticLibrary => "static-library",
            ProjectKind::KernelDriver => "kernel-driver",
            ProjectKind::KernelModule => "kernel-module",
        }
    }

    /// Short name accepted on the command line.
    pub fn short_name(self) -> &'static str {
        match self {
            ProjectKind::Executable => "exe",
            ProjectKind::DynamicLibrary => "dll",
            ProjectKind::StaticLibrary => "lib",
            ProjectKind::KernelDriver => "driver",
            ProjectKind::KernelModule => "module",
        }
    }

    /// Drivers and modules are loaded into the kernel and link against it.
    pub fn is_kernel(self) -> bool {
        matches!(self, ProjectKind::KernelDriver | ProjectKind::KernelModule)
    }

    /// Everything that is not a standalone executable.
    pub fn is_library(self) -> bool {
        !matches!(self, ProjectKind::Executable)
    }

    /// A user-mode DLL, as opposed to a kernel-loaded image.
    pub fn is_user_dll(self) -> bool {
        matches!(self, ProjectKind::DynamicLibrary)
    }

    /// File extension of the linked artifact.
    pub fn output_extension(self) -> &'static str {
        match self {
            ProjectKind::Executable => "exe",
            ProjectKind::DynamicLibrary | ProjectKind::KernelModule => "dll",
            ProjectKind::StaticLibrary => "lib",
            ProjectKind::KernelDriver => "sys",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = WizardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted || kind.short_name() == wanted)
            .ok_or_else(|| {
                WizardError::InvalidSpec(format!(
                    "unknown project kind '{}' (expected one of: exe, dll, lib, driver, module)",
                    s
                ))
            })
    }
}

/// Boolean switches that shape the generated project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFlags {
    /// Link the C runtime library in addition to the OS library.
    pub use_clib: bool,
    /// Place the project under `build/` and emit outputs to shared sibling trees.
    pub extended_layout: bool,
    /// Create the project and its configurations but no files.
    pub empty_project: bool,
    /// Also create the dependent boot-disk image project.
    pub create_boot_disk: bool,
}

/// Immutable description of the project to scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSpec {
    name: String,
    destination: PathBuf,
    kind: ProjectKind,
    flags: ProjectFlags,
    defines: Vec<String>,
    sdk_path: PathBuf,
}

impl ProjectSpec {
    /// Creates a spec after validating the project name.
    pub fn new(
        name: impl Into<String>,
        destination: impl Into<PathBuf>,
        kind: ProjectKind,
    ) -> Result<Self> {
        let name = name.into();
        validate_project_name(&name)?;
        Ok(Self {
            name,
            destination: destination.into(),
            kind,
            flags: ProjectFlags::default(),
            defines: Vec::new(),
            sdk_path: PathBuf::new(),
        })
    }

    pub fn with_flags(mut self, flags: ProjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_sdk_path(mut self, sdk_path: impl Into<PathBuf>) -> Self {
        self.sdk_path = sdk_path.into();
        self
    }

    /// Extra preprocessor defines, kept in the given order and never de-duplicated.
    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines = defines.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn flags(&self) -> ProjectFlags {
        self.flags
    }

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    pub fn sdk_path(&self) -> &Path {
        &self.sdk_path
    }

    /// The project name as a preprocessor symbol: upper case, with every
    /// character outside `[A-Z0-9_]` replaced by `_`.
    pub fn define_name(&self) -> String {
        self.name
            .to_uppercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }

    /// Values available to templates and manifests.
    pub fn placeholders(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("project_name", &self.name);
        context.insert("project_name_upper", &self.name.to_uppercase());
        context.insert("project_name_lower", &self.name.to_lowercase());
        context.insert("project_define", &self.define_name());
        context.insert("project_kind", self.kind.as_str());
        context.insert("output_extension", self.kind.output_extension());
        context.insert("sdk_path", &self.sdk_path.display().to_string());
        context.insert("app_type_userexe", &(self.kind == ProjectKind::Executable));
        context.insert("app_type_userdll", &(self.kind == ProjectKind::DynamicLibrary));
        context.insert("app_type_userlib", &(self.kind == ProjectKind::StaticLibrary));
        context.insert("app_type_krnldrv", &(self.kind == ProjectKind::KernelDriver));
        context.insert("app_type_krnlmod", &(self.kind == ProjectKind::KernelModule));
        context.insert("use_clib", &self.flags.use_clib);
        context.insert("extended_layout", &self.flags.extended_layout);
        context.insert("boot_disk", &self.flags.create_boot_disk);
        let now = chrono::Local::now();
        context.insert("current_date", &now.format("%Y-%m-%d").to_string());
        context.insert("current_year", &now.format("%Y").to_string());
        context
    }
}

/// A project name must be usable as a single path component.
pub fn validate_project_name(name: &str) -> Result<()> {
    const FORBIDDEN: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    if name.trim().is_empty() {
        return Err(anyhow!(WizardError::InvalidSpec(
            "project name is empty".to_string()
        )));
    }
    if name == "." || name == ".." {
        return Err(anyhow!(WizardError::InvalidSpec(format!(
            "project name '{}' is not a valid directory name",
            name
        ))));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| FORBIDDEN.contains(c) || c.is_control())
    {
        return Err(anyhow!(WizardError::InvalidSpec(format!(
            "project name '{}' contains forbidden character {:?}",
            name, bad
        ))));
    }
    Ok(())
}
