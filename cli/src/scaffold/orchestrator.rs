//! # Scaffold Orchestrator
//!
//! File: cli/src/scaffold/orchestrator.rs
//!
//! ## Overview
//!
//! Sequences one scaffold from a `ProjectSpec` to a `ScaffoldResult`:
//!
//! ```text
//! Start -> PathsResolved -> ConfigBuilt -> ManifestLoaded -> FilesRendered -> [BootDiskBuilt] -> Finalized
//!                                 \_____________ empty project _____________________________/
//! ```
//!
//! 1. Resolve the project root (`<destination>` or `<destination>/build` for the
//!    extended layout) and make sure it exists.
//! 2. Derive both build configurations.
//! 3. Unless the project is empty, load the default manifest.
//! 4. Render every manifest entry in order. The first failure aborts the whole
//!    scaffold; files already written stay where they are.
//! 5. Optionally create the boot-disk project.
//!
//! Errors carry the stage that was reached ("Scaffold of 'x' aborted at stage
//! manifest-loaded") while the original `WizardError` stays downcastable.
//!
//! The orchestrator does not persist anything. Handing the result to a
//! `ProjectStore` is the caller's job (see `scaffold::persist`).
//!
use crate::common::fs::io;
use crate::core::error::{Result, WizardError};
use crate::core::templating::TemplateRenderer;
use crate::scaffold::boot_disk::{self, BootDiskProject};
use crate::scaffold::build_config::{self, BuildConfigurations};
use crate::scaffold::manifest::{self, Manifest, ManifestId, TemplateSet};
use crate::scaffold::naming;
use crate::scaffold::spec::{ProjectKind, ProjectSpec};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of the project description files written by the project store.
pub const PROJECT_FILE_EXTENSION: &str = "wizproj";
/// Subdirectory holding the project in the extended layout.
pub const EXTENDED_BUILD_DIR: &str = "build";

/// Progress marker of a running scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldStage {
    Start,
    PathsResolved,
    ConfigBuilt,
    ManifestLoaded,
    FilesRendered,
    BootDiskBuilt,
    Finalized,
}

impl fmt::Display for ScaffoldStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaffoldStage::Start => "start",
            ScaffoldStage::PathsResolved => "paths-resolved",
            ScaffoldStage::ConfigBuilt => "config-built",
            ScaffoldStage::ManifestLoaded => "manifest-loaded",
            ScaffoldStage::FilesRendered => "files-rendered",
            ScaffoldStage::BootDiskBuilt => "boot-disk-built",
            ScaffoldStage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// The materialized project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldResult {
    pub project_name: String,
    pub kind: ProjectKind,
    pub project_root: PathBuf,
    pub project_file: PathBuf,
    /// Created files, relative to `project_root`, in manifest order.
    pub files: Vec<PathBuf>,
    pub configurations: BuildConfigurations,
    pub boot_disk: Option<BootDiskProject>,
}

/// File name of the project description for `project_name`.
pub fn project_file_name(project_name: &str) -> String {
    format!("{}.{}", project_name, PROJECT_FILE_EXTENSION)
}

/// Directory holding the project files for `spec`.
pub fn project_root(spec: &ProjectSpec) -> PathBuf {
    if spec.flags().extended_layout {
        spec.destination().join(EXTENDED_BUILD_DIR)
    } else {
        spec.destination().to_path_buf()
    }
}

/// Runs scaffolds against one template set.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    templates: TemplateSet,
}

impl Scaffolder {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Scaffolds the project described by `spec`.
    pub fn scaffold(&self, spec: &ProjectSpec) -> Result<ScaffoldResult> {
        let mut stage = ScaffoldStage::Start;
        let outcome = self.run(spec, &mut stage);
        outcome.with_context(|| {
            format!("Scaffold of '{}' aborted at stage {}", spec.name(), stage)
        })
    }

    fn run(&self, spec: &ProjectSpec, stage: &mut ScaffoldStage) -> Result<ScaffoldResult> {
        info!("Scaffolding {} project '{}'", spec.kind(), spec.name());

        let root = project_root(spec);
        io::ensure_dir_exists(&root)?;
        *stage = ScaffoldStage::PathsResolved;
        debug!("Project root: {}", root.display());

        let configurations = build_config::build(spec);
        *stage = ScaffoldStage::ConfigBuilt;

        let mut result = ScaffoldResult {
            project_name: spec.name().to_string(),
            kind: spec.kind(),
            project_file: root.join(project_file_name(spec.name())),
            project_root: root,
            files: Vec::new(),
            configurations,
            boot_disk: None,
        };

        if spec.flags().empty_project {
            info!("Empty project requested; skipping templates");
            *stage = ScaffoldStage::Finalized;
            return Ok(result);
        }

        let renderer = TemplateRenderer::new(spec.placeholders());
        let manifest = self.templates.load_manifest(ManifestId::Default, &renderer)?;
        *stage = ScaffoldStage::ManifestLoaded;

        result.files = render_manifest(
            &self.templates,
            &manifest,
            &renderer,
            &result.project_root,
            |logical| naming::resolve_target_name(logical, spec),
        )?;
        *stage = ScaffoldStage::FilesRendered;

        if spec.flags().create_boot_disk {
            let boot = boot_disk::scaffold_boot_disk(
                spec,
                &result.project_root,
                &result.configurations,
                &self.templates,
                &renderer,
            )?;
            result.boot_disk = Some(boot);
            *stage = ScaffoldStage::BootDiskBuilt;
        }

        *stage = ScaffoldStage::Finalized;
        info!(
            "Scaffolded '{}' with {} file(s)",
            result.project_name,
            result.files.len()
        );
        Ok(result)
    }
}

/// Renders every entry of `manifest` into `root`, strictly in manifest order,
/// and returns the created paths relative to `root`. Entries leaving the
/// template root are rejected before anything is written. Two entries
/// resolving to the same normalized target are rejected at the second one.
pub fn render_manifest<F>(
    templates: &TemplateSet,
    manifest: &Manifest,
    renderer: &TemplateRenderer,
    root: &Path,
    resolve: F,
) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> String,
{
    manifest.check_entries()?;

    let mut files = Vec::new();
    let mut seen = HashSet::new();
    for entry in manifest.entries() {
        let target = resolve(&entry.template);
        let destination = root.join(&target);
        if !manifest::is_contained_path(&target) {
            return Err(anyhow!(WizardError::Render {
                path: destination,
                reason: format!(
                    "manifest entry '{}' resolves outside the project root",
                    entry.template
                ),
            }));
        }
        if !seen.insert(target.clone()) {
            return Err(anyhow!(WizardError::Render {
                path: destination,
                reason: format!(
                    "manifest entry '{}' resolves to a file already produced by an earlier entry",
                    entry.template
                ),
            }));
        }
        renderer.render(
            &templates.template_path(&entry.template),
            &destination,
            entry.binary_asset,
        )?;
        files.push(PathBuf::from(target));
    }
    Ok(files)
}
