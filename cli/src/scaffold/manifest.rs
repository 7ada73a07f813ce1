//! # Manifest Reader
//!
//! File: cli/src/scaffold/manifest.rs
//!
//! ## Overview
//!
//! A manifest is a line-oriented text resource in the template root naming, in
//! order, every template file a scaffold must materialize. Two manifests exist:
//! `Templates.inf` for the project itself and `BootDisk.inf` for the optional
//! boot-disk project.
//!
//! ## Architecture
//!
//! - `TemplateSet` locates manifests and template files under one root.
//! - The manifest text is passed through the template engine before its lines
//!   are read, so a line can be made conditional on project flags
//!   (`{% if use_clib %}...{% endif %}`).
//! - `Manifest::entries` yields `ManifestEntry` values lazily, in file order,
//!   skipping blank lines. It can be called any number of times.
//! - Entry paths are normalized (`./a.txt` is `a.txt`). A loaded manifest
//!   never names a path that is absolute or climbs out with `..`.
//!
//! Reading has no side effects on any destination.
//!
use crate::core::error::{Result, WizardError};
use crate::core::templating::{is_copy_only_asset, TemplateRenderer};
use anyhow::anyhow;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Identifies one of the manifests a template set provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestId {
    Default,
    BootDisk,
}

impl ManifestId {
    pub fn as_str(self) -> &'static str {
        match self {
            ManifestId::Default => "default",
            ManifestId::BootDisk => "boot-disk",
        }
    }

    /// File backing this manifest inside the template root.
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestId::Default => "Templates.inf",
            ManifestId::BootDisk => "BootDisk.inf",
        }
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template file named by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Template path relative to the template root.
    pub template: String,
    /// Copied verbatim instead of rendered.
    pub binary_asset: bool,
}

impl ManifestEntry {
    fn from_line(line: &str) -> Self {
        let template = relative_components(line)
            .map(|parts| parts.join("/"))
            .unwrap_or_else(|| line.to_string());
        Self {
            binary_asset: is_copy_only_asset(Path::new(&template)),
            template,
        }
    }

    /// Whether the entry stays inside the template root.
    pub fn is_contained(&self) -> bool {
        is_contained_path(&self.template)
    }
}

/// True when `path` is relative and does not climb above its base.
pub fn is_contained_path(path: &str) -> bool {
    relative_components(path).is_some()
}

/// Plain components of `line` with `.` dropped. `None` for absolute paths,
/// drive prefixes, `..` components, or a line naming no file at all.
fn relative_components(line: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    for component in Path::new(line).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!parts.is_empty()).then_some(parts)
}

/// A loaded manifest, ready to be iterated.
#[derive(Debug, Clone)]
pub struct Manifest {
    id: ManifestId,
    path: PathBuf,
    text: String,
}

impl Manifest {
    /// Builds a manifest from already rendered text.
    pub fn from_text(id: ManifestId, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> ManifestId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in file order. Blank lines are skipped.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry> + '_ {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ManifestEntry::from_line)
    }

    /// Fails with `ManifestRead` at the first entry leaving the template root.
    pub fn check_entries(&self) -> Result<()> {
        match self.entries().find(|entry| !entry.is_contained()) {
            Some(entry) => Err(anyhow!(WizardError::ManifestRead {
                path: self.path.clone(),
                reason: format!(
                    "entry '{}' must be a relative path inside the template root",
                    entry.template
                ),
            })),
            None => Ok(()),
        }
    }
}

/// A template root: manifests plus the template files they name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    root: PathBuf,
}

impl TemplateSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self, id: ManifestId) -> PathBuf {
        self.root.join(id.file_name())
    }

    pub fn template_path(&self, logical_name: &str) -> PathBuf {
        self.root.join(logical_name)
    }

    /// Reads the manifest `id` and renders it with `renderer`'s values.
    pub fn load_manifest(&self, id: ManifestId, renderer: &TemplateRenderer) -> Result<Manifest> {
        let path = self.manifest_path(id);
        if !path.is_file() {
            return Err(anyhow!(WizardError::ManifestNotFound {
                id: id.as_str().to_string(),
                path,
            }));
        }
        let raw = fs::read_to_string(&path).map_err(|e| {
            anyhow!(WizardError::ManifestRead {
                path: path.clone(),
                reason: e.to_string(),
            })
        })?;
        let text = renderer.render_str(&raw, &path).map_err(|e| {
            anyhow!(WizardError::ManifestRead {
                path: path.clone(),
                reason: format!("{:#}", e),
            })
        })?;
        let manifest = Manifest::from_text(id, path, text);
        manifest.check_entries()?;
        debug!("Loaded {} manifest from {}", id, manifest.path().display());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn renderer(use_clib: bool) -> TemplateRenderer {
        let mut context = tera::Context::new();
        context.insert("use_clib", &use_clib);
        TemplateRenderer::new(context)
    }

    fn names(manifest: &Manifest) -> Vec<String> {
        manifest.entries().map(|e| e.template).collect()
    }

    #[test]
    fn test_entries_skip_blank_lines_and_keep_order() {
        let manifest = Manifest::from_text(
            ManifestId::Default,
            "Templates.inf",
            "main.c\n\n  \nReadMe.txt\r\napp.ico\n",
        );
        let entries: Vec<ManifestEntry> = manifest.entries().collect();
        assert_eq!(
            entries,
            vec![
                ManifestEntry { template: "main.c".into(), binary_asset: false },
                ManifestEntry { template: "ReadMe.txt".into(), binary_asset: false },
                ManifestEntry { template: "app.ico".into(), binary_asset: true },
            ]
        );
    }

    #[test]
    fn test_entries_drop_current_dir_components() {
        let manifest = Manifest::from_text(
            ManifestId::Default,
            "Templates.inf",
            "./main.c\nsub/./util.h\n./res/./app.ico\n",
        );
        assert_eq!(names(&manifest), ["main.c", "sub/util.h", "res/app.ico"]);
        assert!(manifest.entries().all(|e| e.is_contained()));
        assert!(manifest.entries().last().is_some_and(|e| e.binary_asset));
    }

    #[test]
    fn test_load_rejects_entries_outside_the_root() {
        let root = tempdir().unwrap();
        let set = TemplateSet::new(root.path());
        for line in ["../secret.txt", "/etc/passwd", "sub/../../up.c", "."] {
            fs::write(root.path().join("Templates.inf"), format!("main.c\n{}\n", line)).unwrap();
            let err = set
                .load_manifest(ManifestId::Default, &renderer(false))
                .unwrap_err();
            match err.downcast_ref::<WizardError>() {
                Some(WizardError::ManifestRead { path, reason }) => {
                    assert_eq!(path, &root.path().join("Templates.inf"));
                    assert!(reason.contains(line), "{} not in {}", line, reason);
                }
                other => panic!("expected ManifestRead for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_contained_paths() {
        assert!(is_contained_path("a.txt"));
        assert!(is_contained_path("sub/dir/a.txt"));
        assert!(!is_contained_path("../a.txt"));
        assert!(!is_contained_path("/a.txt"));
        assert!(!is_contained_path(""));
    }

    #[test]
    fn test_entries_are_restartable() {
        let manifest = Manifest::from_text(ManifestId::Default, "x", "a.c\nb.c\n");
        assert_eq!(names(&manifest), names(&manifest));
        assert_eq!(manifest.entries().count(), 2);
    }

    #[test]
    fn test_load_renders_conditional_lines() -> Result<()> {
        let root = tempdir()?;
        fs::write(
            root.path().join("Templates.inf"),
            "main.c\n{% if use_clib %}stdio.txt\n{% endif %}ReadMe.txt\n",
        )?;
        let set = TemplateSet::new(root.path());

        let with = set.load_manifest(ManifestId::Default, &renderer(true))?;
        assert_eq!(names(&with), ["main.c", "stdio.txt", "ReadMe.txt"]);

        let without = set.load_manifest(ManifestId::Default, &renderer(false))?;
        assert_eq!(names(&without), ["main.c", "ReadMe.txt"]);
        Ok(())
    }

    #[test]
    fn test_missing_manifest() {
        let root = tempdir().unwrap();
        let set = TemplateSet::new(root.path());
        let err = set
            .load_manifest(ManifestId::BootDisk, &renderer(false))
            .unwrap_err();
        match err.downcast_ref::<WizardError>() {
            Some(WizardError::ManifestNotFound { id, path }) => {
                assert_eq!(id, "boot-disk");
                assert_eq!(path, &root.path().join("BootDisk.inf"));
            }
            other => panic!("expected ManifestNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_manifest_is_read_error() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("Templates.inf"), [0xff, 0xfe, 0x00, b'\n']).unwrap();
        let set = TemplateSet::new(root.path());
        let err = set
            .load_manifest(ManifestId::Default, &renderer(false))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::ManifestRead { .. })
        ));
    }

    #[test]
    fn test_broken_manifest_syntax_is_read_error() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("Templates.inf"), "{% if use_clib %}\nmain.c\n").unwrap();
        let set = TemplateSet::new(root.path());
        let err = set
            .load_manifest(ManifestId::Default, &renderer(true))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::ManifestRead { .. })
        ));
    }
}
