//! # WizGen Project New Command
//!
//! File: cli/src/commands/project/new.rs
//!
//! ## Overview
//!
//! Implements `wizgen project new`, the full scaffold:
//!
//! 1. Load configuration and build the `ProjectSpec` (command line wins).
//! 2. Refuse an existing destination unless `--force` is given.
//! 3. Run the scaffold orchestrator against the template set.
//! 4. Save the project files through the TOML project store.
//! 5. Print a summary with a relative `cd` hint.
//!
//! A failing step stops the command. Files written before the failure are
//! left in place.
//!
use super::{resolve_templates_dir, SpecArgs};
use crate::core::config;
use crate::core::error::Result;
use crate::scaffold::manifest::TemplateSet;
use crate::scaffold::orchestrator::{ScaffoldResult, Scaffolder};
use crate::scaffold::persist::{self, TomlProjectStore};
use anyhow::Context;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Arguments for `wizgen project new`.
#[derive(Parser, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Template set root (overrides configuration).
    #[arg(long, short = 't')]
    pub templates: Option<PathBuf>,

    /// Scaffold into an existing directory, overwriting colliding files.
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub fn handle_new(args: NewArgs) -> Result<()> {
    info!("Handling project new command...");
    let cfg = config::load_config().context("Failed to load WizGen configuration")?;
    let spec = args.spec.to_spec(&cfg)?;
    let template_root = resolve_templates_dir(args.templates.as_deref(), &cfg);
    debug!("Using template set at {}", template_root.display());

    check_destination(spec.destination(), args.force)?;

    let result = Scaffolder::new(TemplateSet::new(template_root)).scaffold(&spec)?;

    let mut store = TomlProjectStore::new();
    let saved = persist::persist_result(&result, &mut store)
        .with_context(|| format!("Failed to save project files for '{}'", result.project_name))?;
    debug!("Saved {} project file(s)", saved.len());

    print_completion_message(&result);
    Ok(())
}

/// A destination that is a file is always an error; an existing directory
/// needs `--force`.
fn check_destination(destination: &Path, force: bool) -> Result<()> {
    if !destination.exists() {
        return Ok(());
    }
    if !destination.is_dir() {
        anyhow::bail!(
            "Target path '{}' exists but is a file, cannot create project directory.",
            destination.display()
        );
    }
    if !force {
        anyhow::bail!(
            "Target directory '{}' already exists. Use --force to overwrite or choose a different project name/output directory.",
            destination.display()
        );
    }
    warn!(
        "Target directory '{}' already exists. Proceeding due to --force flag. Existing files may be overwritten.",
        destination.display()
    );
    Ok(())
}

fn print_completion_message(result: &ScaffoldResult) {
    println!(
        "\n✅ Project '{}' ({}) created successfully!",
        result.project_name, result.kind
    );
    println!("   Location: {}", result.project_root.display());
    println!("   Project file: {}", result.project_file.display());

    if result.files.is_empty() {
        println!("   Files: none (empty project)");
    } else {
        println!("   Files:");
        for file in &result.files {
            println!("     {}", file.display());
        }
    }
    if let Some(boot) = &result.boot_disk {
        println!(
            "   Boot disk project: {} (depends on '{}')",
            boot.project_root.display(),
            boot.depends_on
        );
    }

    let display_path = match env::current_dir() {
        Ok(cwd) => pathdiff::diff_paths(&result.project_root, &cwd)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| result.project_root.display().to_string()),
        Err(_) => result.project_root.display().to_string(),
    };
    println!("\nNext steps:");
    println!("  1. Navigate to your project: cd {}", display_path);
    println!(
        "  2. Inspect the build settings: wizgen project config {} --kind {}",
        result.project_name,
        result.kind.short_name()
    );
}
