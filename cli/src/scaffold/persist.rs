//! # Project Persistence
//!
//! File: cli/src/scaffold/persist.rs
//!
//! ## Overview
//!
//! The orchestrator only produces a `ScaffoldResult`. Turning that result into a
//! project description a build host understands is the job of a `ProjectStore`.
//! The trait is deliberately narrow: create a project, attach configurations,
//! files, custom build steps and dependencies, then save.
//!
//! `TomlProjectStore` is the shipped implementation. Each project becomes a
//! pretty-printed TOML document at its project file (`<root>/<name>.wizproj`).
//!
//! ## Example Output
//!
//! ```toml
//! name = "myapp"
//! kind = "executable"
//! files = ["myapp.c", "ReadMe.txt"]
//!
//! [configurations.debug]
//! variant = "debug"
//! optimization = "none"
//! ...
//! ```
//!
use crate::common::fs::io;
use crate::core::error::{Result, WizardError};
use crate::scaffold::boot_disk::CustomBuildStep;
use crate::scaffold::build_config::{BuildConfiguration, Variant};
use crate::scaffold::orchestrator::ScaffoldResult;
use crate::scaffold::spec::ProjectKind;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Narrow interface to whatever records projects for the build host.
pub trait ProjectStore {
    type Handle: Copy;

    /// Registers a project. `kind` is `None` for utility projects that build
    /// nothing themselves (the boot-disk project).
    fn create_project(
        &mut self,
        name: &str,
        kind: Option<ProjectKind>,
        project_file: &Path,
    ) -> Result<Self::Handle>;

    fn set_configuration(
        &mut self,
        project: Self::Handle,
        variant: Variant,
        configuration: &BuildConfiguration,
    ) -> Result<()>;

    fn add_file(&mut self, project: Self::Handle, path: &Path) -> Result<()>;

    fn set_custom_build_step(
        &mut self,
        project: Self::Handle,
        variant: Variant,
        step: &CustomBuildStep,
    ) -> Result<()>;

    /// Records that `project` must be built after the project named `depends_on`.
    fn add_dependency(&mut self, project: Self::Handle, depends_on: &str) -> Result<()>;

    fn save(&mut self, project: Self::Handle) -> Result<()>;
}

/// Hands a finished scaffold to `store`: the primary project first, then the
/// boot-disk project if one was created. Returns the saved project files.
pub fn persist_result<S: ProjectStore>(result: &ScaffoldResult, store: &mut S) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();

    let project = store.create_project(&result.project_name, Some(result.kind), &result.project_file)?;
    for configuration in result.configurations.iter() {
        store.set_configuration(project, configuration.variant, configuration)?;
    }
    for file in &result.files {
        store.add_file(project, file)?;
    }
    store.save(project)?;
    saved.push(result.project_file.clone());

    if let Some(boot) = &result.boot_disk {
        let handle = store.create_project(&boot.name, None, &boot.project_file)?;
        for file in &boot.files {
            store.add_file(handle, file)?;
        }
        for variant in Variant::ALL {
            store.set_custom_build_step(handle, variant, boot.step(variant))?;
        }
        store.add_dependency(handle, &boot.depends_on)?;
        store.save(handle)?;
        saved.push(boot.project_file.clone());
    }

    Ok(saved)
}

/// On-disk shape of one project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProjectKind>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub configurations: BTreeMap<String, BuildConfiguration>,
    #[serde(default)]
    pub custom_build_steps: BTreeMap<String, CustomBuildStep>,
}

impl ProjectDocument {
    fn new(name: &str, kind: Option<ProjectKind>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            depends_on: Vec::new(),
            files: Vec::new(),
            configurations: BTreeMap::new(),
            custom_build_steps: BTreeMap::new(),
        }
    }
}

/// Writes each project as a TOML document.
#[derive(Debug, Default)]
pub struct TomlProjectStore {
    projects: Vec<(PathBuf, ProjectDocument)>,
}

impl TomlProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a project file written by this store.
    pub fn load(path: &Path) -> Result<ProjectDocument> {
        let content = io::read_file_to_string(path).map_err(|e| {
            anyhow!(WizardError::Persistence(format!(
                "Failed to read project file '{}': {:#}",
                path.display(),
                e
            )))
        })?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(WizardError::Persistence(format!(
                "Failed to parse project file '{}': {}",
                path.display(),
                e
            )))
        })
    }

    fn document(&mut self, project: usize) -> Result<&mut (PathBuf, ProjectDocument)> {
        self.projects.get_mut(project).ok_or_else(|| {
            anyhow!(WizardError::Persistence(format!(
                "Unknown project handle {}",
                project
            )))
        })
    }
}

impl ProjectStore for TomlProjectStore {
    type Handle = usize;

    fn create_project(
        &mut self,
        name: &str,
        kind: Option<ProjectKind>,
        project_file: &Path,
    ) -> Result<usize> {
        debug!("Creating project '{}' at {}", name, project_file.display());
        self.projects
            .push((project_file.to_path_buf(), ProjectDocument::new(name, kind)));
        Ok(self.projects.len() - 1)
    }

    fn set_configuration(
        &mut self,
        project: usize,
        variant: Variant,
        configuration: &BuildConfiguration,
    ) -> Result<()> {
        let (_, doc) = self.document(project)?;
        doc.configurations
            .insert(variant.as_str().to_string(), configuration.clone());
        Ok(())
    }

    fn add_file(&mut self, project: usize, path: &Path) -> Result<()> {
        let (_, doc) = self.document(project)?;
        doc.files.push(path.to_path_buf());
        Ok(())
    }

    fn set_custom_build_step(
        &mut self,
        project: usize,
        variant: Variant,
        step: &CustomBuildStep,
    ) -> Result<()> {
        let (_, doc) = self.document(project)?;
        doc.custom_build_steps
            .insert(variant.as_str().to_string(), step.clone());
        Ok(())
    }

    fn add_dependency(&mut self, project: usize, depends_on: &str) -> Result<()> {
        let (_, doc) = self.document(project)?;
        doc.depends_on.push(depends_on.to_string());
        Ok(())
    }

    fn save(&mut self, project: usize) -> Result<()> {
        let (path, doc) = self.document(project)?;
        let path = path.clone();
        let content = toml::to_string_pretty(doc).map_err(|e| {
            anyhow!(WizardError::Persistence(format!(
                "Failed to serialize project '{}': {}",
                doc.name, e
            )))
        })?;
        io::write_string_to_file(&path, &content).map_err(|e| {
            anyhow!(WizardError::Persistence(format!(
                "Failed to write project file '{}': {:#}",
                path.display(),
                e
            )))
        })?;
        info!("Saved project file {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::boot_disk::{self, BootDiskProject};
    use crate::scaffold::build_config;
    use crate::scaffold::spec::{ProjectFlags, ProjectSpec};
    use tempfile::tempdir;

    /// Records every call instead of writing anything.
    #[derive(Default)]
    struct RecordingStore {
        calls: Vec<String>,
        fail_on_save: bool,
    }

    impl ProjectStore for RecordingStore {
        type Handle = u32;

        fn create_project(&mut self, name: &str, kind: Option<ProjectKind>, _: &Path) -> Result<u32> {
            self.calls.push(format!(
                "create {} {}",
                name,
                kind.map(|k| k.short_name()).unwrap_or("utility")
            ));
            Ok(self.calls.len() as u32)
        }

        fn set_configuration(&mut self, _: u32, variant: Variant, c: &BuildConfiguration) -> Result<()> {
            self.calls.push(format!("config {} {}", variant, c.optimization));
            Ok(())
        }

        fn add_file(&mut self, _: u32, path: &Path) -> Result<()> {
            self.calls.push(format!("file {}", path.display()));
            Ok(())
        }

        fn set_custom_build_step(&mut self, _: u32, variant: Variant, step: &CustomBuildStep) -> Result<()> {
            self.calls.push(format!("step {} {}", variant, step.command.len()));
            Ok(())
        }

        fn add_dependency(&mut self, _: u32, depends_on: &str) -> Result<()> {
            self.calls.push(format!("depends {}", depends_on));
            Ok(())
        }

        fn save(&mut self, _: u32) -> Result<()> {
            if self.fail_on_save {
                return Err(anyhow!(WizardError::Persistence("disk full".into())));
            }
            self.calls.push("save".into());
            Ok(())
        }
    }

    fn result(root: &Path, with_boot_disk: bool) -> ScaffoldResult {
        let spec = ProjectSpec::new("myapp", root, ProjectKind::Executable)
            .unwrap()
            .with_sdk_path("/sdk")
            .with_flags(ProjectFlags {
                create_boot_disk: with_boot_disk,
                ..Default::default()
            });
        let configurations = build_config::build(&spec);
        let boot_root = boot_disk::boot_disk_root(root);
        let boot = with_boot_disk.then(|| BootDiskProject {
            name: "bootdisk".into(),
            project_file: boot_root.join("bootdisk.wizproj"),
            project_root: boot_root,
            files: vec![PathBuf::from("boot.lst")],
            depends_on: "myapp".into(),
            debug: boot_disk::build_step(&spec, &configurations, Variant::Debug),
            release: boot_disk::build_step(&spec, &configurations, Variant::Release),
        });
        ScaffoldResult {
            project_name: "myapp".into(),
            kind: ProjectKind::Executable,
            project_root: root.to_path_buf(),
            project_file: root.join("myapp.wizproj"),
            files: vec![PathBuf::from("myapp.c"), PathBuf::from("ReadMe.txt")],
            configurations,
            boot_disk: boot,
        }
    }

    #[test]
    fn test_persist_call_sequence() -> Result<()> {
        let mut store = RecordingStore::default();
        let saved = persist_result(&result(Path::new("/w/myapp"), true), &mut store)?;

        assert_eq!(
            store.calls,
            vec![
                "create myapp exe",
                "config debug none",
                "config release full",
                "file myapp.c",
                "file ReadMe.txt",
                "save",
                "create bootdisk utility",
                "file boot.lst",
                "step debug 18",
                "step release 17",
                "depends myapp",
                "save",
            ]
        );
        assert_eq!(saved.len(), 2);
        Ok(())
    }

    #[test]
    fn test_store_failure_propagates_unchanged() {
        let mut store = RecordingStore {
            fail_on_save: true,
            ..Default::default()
        };
        let err = persist_result(&result(Path::new("/w/myapp"), false), &mut store).unwrap_err();
        match err.downcast_ref::<WizardError>() {
            Some(WizardError::Persistence(msg)) => assert_eq!(msg, "disk full"),
            other => panic!("expected Persistence error, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_store_writes_project_files() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("myapp");
        let scaffold = result(&root, true);
        let mut store = TomlProjectStore::new();
        persist_result(&scaffold, &mut store)?;

        let primary = TomlProjectStore::load(&root.join("myapp.wizproj"))?;
        assert_eq!(primary.name, "myapp");
        assert_eq!(primary.kind, Some(ProjectKind::Executable));
        assert_eq!(primary.files, scaffold.files);
        assert_eq!(primary.configurations["debug"], scaffold.configurations.debug);
        assert_eq!(primary.configurations["release"], scaffold.configurations.release);
        assert!(primary.custom_build_steps.is_empty());

        let boot = TomlProjectStore::load(&root.join("bootdisk").join("bootdisk.wizproj"))?;
        assert_eq!(boot.kind, None);
        assert_eq!(boot.depends_on, vec!["myapp".to_string()]);
        assert_eq!(boot.files, vec![PathBuf::from("boot.lst")]);
        assert!(boot.custom_build_steps["debug"]
            .command
            .contains(&"-Kdebug".to_string()));
        assert!(boot.configurations.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_handle_is_persistence_error() {
        let mut store = TomlProjectStore::new();
        let err = store.add_file(3, Path::new("x.c")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::Persistence(_))
        ));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.wizproj");
        std::fs::write(&path, "name = [").unwrap();
        let err = TomlProjectStore::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::Persistence(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.wizproj");
        let err = TomlProjectStore::load(&path).unwrap_err();
        match err.downcast_ref::<WizardError>() {
            Some(WizardError::Persistence(message)) => {
                assert!(message.contains("absent.wizproj"));
            }
            other => panic!("expected Persistence error, got {:?}", other),
        }
    }
}
