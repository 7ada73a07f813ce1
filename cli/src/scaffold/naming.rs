//! # Target Name Resolver
//!
//! File: cli/src/scaffold/naming.rs
//!
//! Maps a manifest's logical template name to the file name created in the new
//! project. There is exactly one rewriting rule: the generic entry-point
//! template `main.c` becomes `<projectname>.c`. Every other name passes through
//! unchanged.
//!
use crate::scaffold::spec::ProjectSpec;

/// Logical name of the single entry-point template.
pub const ENTRY_POINT_TEMPLATE: &str = "main.c";

/// Resolves `logical_name` for the project described by `spec`.
pub fn resolve_target_name(logical_name: &str, spec: &ProjectSpec) -> String {
    resolve_for_project(logical_name, spec.name())
}

/// Same rule, keyed by a bare project name (used for the boot-disk project,
/// which has no `ProjectSpec` of its own).
pub fn resolve_for_project(logical_name: &str, project_name: &str) -> String {
    if logical_name == ENTRY_POINT_TEMPLATE {
        format!("{}.c", project_name)
    } else {
        logical_name.to_string()
    }
}
