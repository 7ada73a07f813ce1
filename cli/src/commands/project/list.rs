//! # WizGen Project List Command
//!
//! File: cli/src/commands/project/list.rs
//!
//! ## Overview
//!
//! Implements `wizgen project list`, a dry look at a template set. Both
//! manifests are loaded and rendered for a sample project, and each entry is
//! shown with the file name it would produce:
//!
//! ```text
//! Template set: /home/user/.config/wizgen/templates
//!
//! Manifest 'default' (Templates.inf):
//!   main.c                   -> myapp.c
//!   ReadMe.txt               -> ReadMe.txt
//!   app.ico                  -> app.ico [copy]
//!
//! Manifest 'boot-disk' (BootDisk.inf):
//!   boot.lst                 -> boot.lst
//! ```
//!
//! Files under the template root that no manifest names are reported as
//! unreferenced. Manifest lines switched off by a condition count as
//! unreferenced for the flags used here.
//!
use super::resolve_templates_dir;
use crate::core::config;
use crate::core::error::{Result, WizardError};
use crate::core::templating::TemplateRenderer;
use crate::scaffold::boot_disk::BOOT_DISK_PROJECT_NAME;
use crate::scaffold::manifest::{ManifestEntry, ManifestId, TemplateSet};
use crate::scaffold::naming;
use crate::scaffold::spec::{ProjectFlags, ProjectKind, ProjectSpec};
use anyhow::Context;
use clap::Parser;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Arguments for `wizgen project list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Template set root (overrides configuration).
    #[arg(long, short = 't')]
    pub templates: Option<PathBuf>,

    /// Sample project name used to resolve target names.
    #[arg(long, default_value = "myapp")]
    pub name: String,

    /// Sample project kind used when rendering manifests.
    #[arg(long, short = 'k', default_value = "exe")]
    pub kind: ProjectKind,

    /// Render manifests as if the C library were used.
    #[arg(long)]
    pub clib: bool,
}

/// One manifest as it would be applied.
struct ManifestListing {
    id: ManifestId,
    entries: Option<Vec<(ManifestEntry, String)>>,
}

pub fn handle_list(args: ListArgs) -> Result<()> {
    info!("Handling project list command...");
    let cfg = config::load_config().context("Failed to load WizGen configuration")?;
    let root = resolve_templates_dir(args.templates.as_deref(), &cfg);
    if !root.is_dir() {
        anyhow::bail!(
            "Template directory '{}' is not a valid directory (or does not exist). Please check your wizgen configuration.",
            root.display()
        );
    }

    let spec = ProjectSpec::new(args.name.as_str(), root.join(&args.name), args.kind)?
        .with_sdk_path(&cfg.sdk.path)
        .with_flags(ProjectFlags {
            use_clib: args.clib,
            create_boot_disk: true,
            ..Default::default()
        });
    let templates = TemplateSet::new(&root);
    let renderer = TemplateRenderer::new(spec.placeholders());

    let mut listings = Vec::new();
    for id in [ManifestId::Default, ManifestId::BootDisk] {
        listings.push(list_manifest(&templates, id, &renderer, spec.name())?);
    }
    let unreferenced = find_unreferenced(&root, &listings)?;

    print_listing(&root, &listings, &unreferenced);
    Ok(())
}

/// Loads manifest `id`. A missing manifest yields `entries: None`; any other
/// failure is returned.
fn list_manifest(
    templates: &TemplateSet,
    id: ManifestId,
    renderer: &TemplateRenderer,
    project_name: &str,
) -> Result<ManifestListing> {
    let manifest = match templates.load_manifest(id, renderer) {
        Ok(manifest) => manifest,
        Err(e) if matches!(e.downcast_ref::<WizardError>(), Some(WizardError::ManifestNotFound { .. })) => {
            warn!("{}", e);
            return Ok(ManifestListing { id, entries: None });
        }
        Err(e) => return Err(e),
    };

    let owner = match id {
        ManifestId::Default => project_name,
        ManifestId::BootDisk => BOOT_DISK_PROJECT_NAME,
    };
    let entries = manifest
        .entries()
        .map(|entry| {
            let target = naming::resolve_for_project(&entry.template, owner);
            (entry, target)
        })
        .collect();
    Ok(ManifestListing {
        id,
        entries: Some(entries),
    })
}

/// Files under `root` that are neither a manifest nor named by one, as
/// `/`-separated relative paths, sorted.
fn find_unreferenced(root: &Path, listings: &[ManifestListing]) -> Result<Vec<String>> {
    let mut referenced: BTreeSet<String> = [ManifestId::Default, ManifestId::BootDisk]
        .iter()
        .map(|id| id.file_name().to_string())
        .collect();
    for listing in listings {
        for (entry, _) in listing.entries.iter().flatten() {
            referenced.insert(entry.template.replace('\\', "/"));
        }
    }

    let mut unreferenced = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| {
            format!("Failed to walk template directory '{}'", root.display())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !referenced.contains(&relative) {
            debug!("Unreferenced template file: {}", relative);
            unreferenced.push(relative);
        }
    }
    Ok(unreferenced)
}

fn print_listing(root: &Path, listings: &[ManifestListing], unreferenced: &[String]) {
    println!("Template set: {}", root.display());

    let mut total = 0;
    for listing in listings {
        println!(
            "\nManifest '{}' ({}):",
            listing.id,
            listing.id.file_name()
        );
        match &listing.entries {
            None => println!("  (not present)"),
            Some(entries) if entries.is_empty() => println!("  (no entries)"),
            Some(entries) => {
                for (entry, target) in entries {
                    let marker = if entry.binary_asset { " [copy]" } else { "" };
                    println!("  {:<24} -> {}{}", entry.template, target, marker);
                }
                total += entries.len();
            }
        }
    }

    println!("\nFound {} template entr{}.", total, if total == 1 { "y" } else { "ies" });

    if !unreferenced.is_empty() {
        warn!(
            "{} file(s) in the template set are not named by any manifest",
            unreferenced.len()
        );
        println!("\nUnreferenced template files:");
        for file in unreferenced {
            println!("  {}", file);
        }
    }
}
