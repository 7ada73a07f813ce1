//! # Configuration Builder
//!
//! File: cli/src/scaffold/build_config.rs
//!
//! ## Overview
//!
//! Derives the compiler and linker settings of a project's two build variants
//! (`debug` and `release`) from its `ProjectSpec`. The derivation is a pure
//! function: no filesystem access, no shared state, and every field of the
//! resulting `BuildConfiguration` is decided here in one shot. The persistence
//! collaborator applies the finished records; nothing patches them afterwards.
//!
//! ## Derivation Table
//!
//! | Setting              | debug                         | release                          |
//! |----------------------|-------------------------------|----------------------------------|
//! | output dir (local)   | `debug`                       | `release`                        |
//! | output dir (extended)| `../dbg/bin` or `../dbg/lib`  | `../bin` or `../lib`             |
//! | optimization         | none                          | full                             |
//! | inlining, intrinsics | off                           | on                               |
//! | string pooling, COMDAT folding | off                 | on                               |
//! | debug info           | on                            | off (on with extended layout)    |
//! | defines              | NAME[_LIB], [KERNEL], DEBUG, SANOS, extras | NAME[_LIB], [KERNEL], NDEBUG, SANOS, extras |
//! | library dirs         | `<sdk>/dbg/lib`               | `<sdk>/lib`                      |
//!
//! Libraries: `krnl.lib` for kernel kinds, otherwise `os.lib` plus `libc.lib`
//! when the C library is used. Entry point: `DllMain` for user-mode DLLs,
//! `start` for every other library kind (static libraries, kernel drivers and
//! modules), none for executables.
//!
//! Paths are relative to the project root unless they come from the SDK path.
//!
use crate::scaffold::spec::{ProjectKind, ProjectSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const OS_LIB: &str = "os.lib";
pub const CLIB_LIB: &str = "libc.lib";
pub const KERNEL_LIB: &str = "krnl.lib";

/// The two build variants every project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Debug,
    Release,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Debug, Variant::Release];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Debug => "debug",
            Variant::Release => "release",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimization {
    None,
    Size,
    Speed,
    Full,
}

impl fmt::Display for Optimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Optimization::None => "none",
            Optimization::Size => "size",
            Optimization::Speed => "speed",
            Optimization::Full => "full",
        };
        f.write_str(name)
    }
}

/// What the linker (or librarian) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigurationType {
    Application,
    DynamicLibrary,
    StaticLibrary,
}

impl From<ProjectKind> for ConfigurationType {
    fn from(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Executable => ConfigurationType::Application,
            ProjectKind::StaticLibrary => ConfigurationType::StaticLibrary,
            ProjectKind::DynamicLibrary | ProjectKind::KernelDriver | ProjectKind::KernelModule => {
                ConfigurationType::DynamicLibrary
            }
        }
    }
}

/// Fully derived settings for one variant of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub variant: Variant,
    pub configuration_type: ConfigurationType,
    pub output_directory: PathBuf,
    pub intermediate_directory: PathBuf,
    pub output_file: PathBuf,

    // Compiler
    pub optimization: Optimization,
    pub inline_functions: bool,
    pub intrinsic_functions: bool,
    pub omit_frame_pointers: bool,
    pub string_pooling: bool,
    pub function_level_linking: bool,
    pub defines: Vec<String>,
    pub include_directories: Vec<PathBuf>,
    pub ignore_standard_include_path: bool,
    pub exception_handling: bool,
    pub warning_level: u8,
    pub precompiled_header: PathBuf,

    // Linker
    pub libraries: Vec<String>,
    pub library_directories: Vec<PathBuf>,
    pub ignore_default_libraries: bool,
    pub linker_options: Vec<String>,
    pub entry_point: Option<String>,
    pub debug_info: bool,
    pub program_database: Option<PathBuf>,
}

/// The debug/release pair. Exactly one record per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfigurations {
    pub debug: BuildConfiguration,
    pub release: BuildConfiguration,
}

impl BuildConfigurations {
    pub fn get(&self, variant: Variant) -> &BuildConfiguration {
        match variant {
            Variant::Debug => &self.debug,
            Variant::Release => &self.release,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildConfiguration> {
        [&self.debug, &self.release].into_iter()
    }
}

/// Derives both variants for `spec`.
pub fn build(spec: &ProjectSpec) -> BuildConfigurations {
    BuildConfigurations {
        debug: build_variant(spec, Variant::Debug),
        release: build_variant(spec, Variant::Release),
    }
}

/// Derives a single variant for `spec`.
pub fn build_variant(spec: &ProjectSpec, variant: Variant) -> BuildConfiguration {
    let kind = spec.kind();
    let extended = spec.flags().extended_layout;
    let optimized = variant == Variant::Release;

    let output_directory = output_directory(spec, variant);
    let intermediate_directory = intermediate_directory(spec, variant);
    let output_file =
        output_directory.join(format!("{}.{}", spec.name(), kind.output_extension()));
    let precompiled_header = intermediate_directory.join(format!("{}.pch", spec.name()));

    let mut library_directories = Vec::new();
    if extended {
        library_directories.push(shared_tree(variant).join("lib"));
    }
    library_directories.push(sdk_library_directory(spec.sdk_path(), variant));

    BuildConfiguration {
        variant,
        configuration_type: kind.into(),
        output_file,
        optimization: if optimized {
            Optimization::Full
        } else {
            Optimization::None
        },
        inline_functions: optimized,
        intrinsic_functions: optimized,
        omit_frame_pointers: optimized,
        string_pooling: optimized,
        function_level_linking: optimized,
        defines: preprocessor_defines(spec, variant),
        include_directories: vec![spec.sdk_path().join("src").join("include")],
        ignore_standard_include_path: true,
        exception_handling: false,
        warning_level: 3,
        precompiled_header,
        libraries: libraries(spec),
        library_directories,
        ignore_default_libraries: true,
        linker_options: vec!["/MACHINE:I386".to_string(), "/FIXED:NO".to_string()],
        entry_point: entry_point(kind).map(str::to_string),
        debug_info: !optimized || extended,
        program_database: program_database(spec, variant),
        output_directory,
        intermediate_directory,
    }
}

/// Root of the shared output tree for `variant`, relative to a project root
/// under `build/`.
fn shared_tree(variant: Variant) -> PathBuf {
    match variant {
        Variant::Debug => Path::new("..").join("dbg"),
        Variant::Release => PathBuf::from(".."),
    }
}

pub fn output_directory(spec: &ProjectSpec, variant: Variant) -> PathBuf {
    if !spec.flags().extended_layout {
        return PathBuf::from(variant.as_str());
    }
    let leaf = if spec.kind() == ProjectKind::StaticLibrary {
        "lib"
    } else {
        "bin"
    };
    shared_tree(variant).join(leaf)
}

pub fn intermediate_directory(spec: &ProjectSpec, variant: Variant) -> PathBuf {
    if !spec.flags().extended_layout {
        return PathBuf::from(variant.as_str());
    }
    shared_tree(variant).join("obj").join(spec.name())
}

fn program_database(spec: &ProjectSpec, variant: Variant) -> Option<PathBuf> {
    let file = format!("{}.pdb", spec.name());
    if spec.flags().extended_layout {
        Some(shared_tree(variant).join("symbols").join(file))
    } else if variant == Variant::Debug {
        Some(PathBuf::from(variant.as_str()).join(file))
    } else {
        None
    }
}

fn sdk_library_directory(sdk: &Path, variant: Variant) -> PathBuf {
    match variant {
        Variant::Debug => sdk.join("dbg").join("lib"),
        Variant::Release => sdk.join("lib"),
    }
}

/// Built-in defines first, caller extras last in their given order. Duplicates
/// supplied by the caller are passed through untouched.
pub fn preprocessor_defines(spec: &ProjectSpec, variant: Variant) -> Vec<String> {
    let mut defines = Vec::with_capacity(4 + spec.defines().len());
    let name = spec.define_name();
    if spec.kind().is_library() {
        defines.push(format!("{}_LIB", name));
    } else {
        defines.push(name);
    }
    if spec.kind().is_kernel() {
        defines.push("KERNEL".to_string());
    }
    defines.push(
        match variant {
            Variant::Debug => "DEBUG",
            Variant::Release => "NDEBUG",
        }
        .to_string(),
    );
    defines.push("SANOS".to_string());
    defines.extend(spec.defines().iter().cloned());
    defines
}

pub fn libraries(spec: &ProjectSpec) -> Vec<String> {
    if spec.kind().is_kernel() {
        vec![KERNEL_LIB.to_string()]
    } else if spec.flags().use_clib {
        vec![OS_LIB.to_string(), CLIB_LIB.to_string()]
    } else {
        vec![OS_LIB.to_string()]
    }
}

pub fn entry_point(kind: ProjectKind) -> Option<&'static str> {
    match kind {
        ProjectKind::DynamicLibrary => Some("DllMain"),
        ProjectKind::StaticLibrary | ProjectKind::KernelDriver | ProjectKind::KernelModule => {
            Some("start")
        }
        ProjectKind::Executable => None,
    }
}
