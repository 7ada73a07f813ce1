//! # WizGen Project Command Group
//!
//! File: cli/src/commands/project/mod.rs
//!
//! ## Overview
//!
//! Entry point and router for `wizgen project`. The subcommands are:
//! - `new`: scaffold a project (and optionally its boot-disk project) and save
//!   the project files
//! - `config`: print the derived debug/release build configurations
//! - `list`: show what a template set would produce
//!
//! ## Examples
//!
//! ```bash
//! # A user-mode executable linked against the C library
//! wizgen project new hello --kind exe --clib
//!
//! # A kernel driver in the extended layout, with a boot disk
//! wizgen project new netdrv --kind driver --extended --boot-disk --output ~/src
//!
//! # Inspect the settings a DLL would get
//! wizgen project config mylib --kind dll -D TRACE
//!
//! # Check a template set
//! wizgen project list --templates ./templates/sanos
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::scaffold::spec::{ProjectFlags, ProjectKind, ProjectSpec};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};

mod config;
mod list;
mod new;

/// Arguments for `wizgen project`.
#[derive(Parser, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// Create a new project from the template set.
    #[command(alias = "n")]
    New(new::NewArgs),
    /// Print the build configurations a project would get.
    Config(config::ConfigArgs),
    /// List the manifests and templates of a template set.
    #[command(alias = "ls")]
    List(list::ListArgs),
}

/// Routes `wizgen project <subcommand>` to its handler.
pub fn handle_project(args: ProjectArgs) -> Result<()> {
    match args.command {
        ProjectCommand::New(args) => new::handle_new(args),
        ProjectCommand::Config(args) => config::handle_config(args),
        ProjectCommand::List(args) => list::handle_list(args),
    }
}

/// Options that describe a project. Shared by `new` and `config`.
#[derive(Args, Debug, Clone)]
pub struct SpecArgs {
    /// Name of the project; also the name of its directory.
    pub name: String,

    /// Project kind: exe, dll, lib, driver or module.
    #[arg(long, short = 'k')]
    pub kind: ProjectKind,

    /// Parent directory of the new project (default: current directory).
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// SDK installation root (overrides configuration).
    #[arg(long)]
    pub sdk: Option<PathBuf>,

    /// Link the C runtime library.
    #[arg(long, overrides_with = "no_clib")]
    pub clib: bool,

    /// Do not link the C runtime library, even if configuration says so.
    #[arg(long = "no-clib", overrides_with = "clib")]
    pub no_clib: bool,

    /// Put the project under `build/` and emit outputs to shared bin/lib/obj trees.
    #[arg(long, overrides_with = "no_extended")]
    pub extended: bool,

    /// Use the flat layout, even if configuration asks for the extended one.
    #[arg(long = "no-extended", overrides_with = "extended")]
    pub no_extended: bool,

    /// Create the project and its configurations without any files.
    #[arg(long)]
    pub empty: bool,

    /// Also create a boot-disk image project.
    #[arg(long = "boot-disk")]
    pub boot_disk: bool,

    /// Extra preprocessor define. May be repeated.
    #[arg(long = "define", short = 'D', action = clap::ArgAction::Append)]
    pub defines: Vec<String>,
}

impl SpecArgs {
    /// Builds the `ProjectSpec`, filling gaps from `cfg`. Command line flags
    /// (including `--no-clib`/`--no-extended`) win over configured ones.
    /// Configured defines come before the ones given on the command line.
    pub fn to_spec(&self, cfg: &Config) -> Result<ProjectSpec> {
        let destination = resolve_output_dir(self.output.as_deref())?.join(&self.name);
        let sdk_path = self
            .sdk
            .clone()
            .unwrap_or_else(|| PathBuf::from(&cfg.sdk.path));
        let flags = ProjectFlags {
            use_clib: cli_switch(self.clib, self.no_clib)
                .or(cfg.defaults.use_clib)
                .unwrap_or(false),
            extended_layout: cli_switch(self.extended, self.no_extended)
                .or(cfg.defaults.extended_layout)
                .unwrap_or(false),
            empty_project: self.empty,
            create_boot_disk: self.boot_disk,
        };
        let defines = cfg
            .defaults
            .defines
            .iter()
            .chain(self.defines.iter())
            .cloned();

        Ok(ProjectSpec::new(self.name.as_str(), destination, self.kind)?
            .with_sdk_path(sdk_path)
            .with_flags(flags)
            .with_defines(defines))
    }
}

/// A `--flag`/`--no-flag` pair as an explicit choice. `None` when neither was
/// given. The two are declared `overrides_with`, so at most one is set.
fn cli_switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Absolute parent directory for a project: `output` resolved against the
/// current directory, or the current directory itself.
fn resolve_output_dir(output: Option<&Path>) -> Result<PathBuf> {
    match output {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(env::current_dir()
            .context("Failed to get current directory")?
            .join(dir)),
        None => env::current_dir().context("Failed to get current directory"),
    }
}

/// Template root from the command line, falling back to configuration.
fn resolve_templates_dir(templates: Option<&Path>, cfg: &Config) -> PathBuf {
    templates
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.templates.directory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_project_new() {
        let args = ProjectArgs::try_parse_from([
            "project", "new", "hello", "--kind", "driver", "--boot-disk", "-D", "A", "-D", "B",
        ])
        .unwrap();
        match args.command {
            ProjectCommand::New(new_args) => {
                assert_eq!(new_args.spec.name, "hello");
                assert_eq!(new_args.spec.kind, ProjectKind::KernelDriver);
                assert!(new_args.spec.boot_disk);
                assert_eq!(new_args.spec.defines, vec!["A", "B"]);
                assert!(!new_args.force);
            }
            _ => panic!("Incorrect subcommand parsed for 'new'"),
        }
    }

    #[test]
    fn test_parses_long_kind_names() {
        let args =
            ProjectArgs::try_parse_from(["project", "config", "m", "--kind", "kernel-module"])
                .unwrap();
        match args.command {
            ProjectCommand::Config(c) => assert_eq!(c.spec.kind, ProjectKind::KernelModule),
            _ => panic!("Incorrect subcommand parsed for 'config'"),
        }
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result = ProjectArgs::try_parse_from(["project", "new", "x", "--kind", "applet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_requires_kind() {
        assert!(ProjectArgs::try_parse_from(["project", "new", "x"]).is_err());
    }

    #[test]
    fn test_parses_project_list() {
        let args = ProjectArgs::try_parse_from(["project", "ls", "--templates", "/t"]).unwrap();
        match args.command {
            ProjectCommand::List(l) => assert_eq!(l.templates, Some(PathBuf::from("/t"))),
            _ => panic!("Incorrect subcommand parsed for 'list'"),
        }
    }

    #[test]
    fn test_to_spec_merges_configuration() -> Result<()> {
        let mut cfg = Config::default();
        cfg.sdk.path = "/opt/sanos".into();
        cfg.defaults.use_clib = Some(true);
        cfg.defaults.defines = vec!["FROM_CONFIG".into()];

        let args = ProjectArgs::try_parse_from([
            "project", "config", "app", "-k", "exe", "-o", "/work", "-D", "FROM_CLI",
        ])?;
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        let spec = c.spec.to_spec(&cfg)?;
        assert_eq!(spec.destination(), Path::new("/work").join("app"));
        assert_eq!(spec.sdk_path(), Path::new("/opt/sanos"));
        assert!(spec.flags().use_clib);
        assert!(!spec.flags().extended_layout);
        assert_eq!(spec.defines(), ["FROM_CONFIG", "FROM_CLI"]);
        Ok(())
    }

    #[test]
    fn test_to_spec_negative_flags_override_configuration() -> Result<()> {
        let mut cfg = Config::default();
        cfg.defaults.use_clib = Some(true);
        cfg.defaults.extended_layout = Some(true);

        let args = ProjectArgs::try_parse_from([
            "project", "config", "app", "-k", "exe", "-o", "/w", "--no-clib", "--no-extended",
        ])?;
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        let spec = c.spec.to_spec(&cfg)?;
        assert!(!spec.flags().use_clib);
        assert!(!spec.flags().extended_layout);

        // Without the switches the configured values apply.
        let args = ProjectArgs::try_parse_from(["project", "config", "app", "-k", "exe", "-o", "/w"])?;
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        let spec = c.spec.to_spec(&cfg)?;
        assert!(spec.flags().use_clib);
        assert!(spec.flags().extended_layout);
        Ok(())
    }

    #[test]
    fn test_last_of_flag_pair_wins() -> Result<()> {
        let cfg = Config::default();
        let args = ProjectArgs::try_parse_from([
            "project", "config", "app", "-k", "exe", "-o", "/w", "--clib", "--no-clib",
            "--no-extended", "--extended",
        ])?;
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        let spec = c.spec.to_spec(&cfg)?;
        assert!(!spec.flags().use_clib);
        assert!(spec.flags().extended_layout);
        Ok(())
    }

    #[test]
    fn test_to_spec_cli_sdk_wins() -> Result<()> {
        let cfg = Config::default();
        let args = ProjectArgs::try_parse_from([
            "project", "config", "app", "-k", "lib", "-o", "/work", "--sdk", "/sdk",
        ])?;
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        assert_eq!(c.spec.to_spec(&cfg)?.sdk_path(), Path::new("/sdk"));
        Ok(())
    }

    #[test]
    fn test_to_spec_rejects_bad_name() {
        let cfg = Config::default();
        let args =
            ProjectArgs::try_parse_from(["project", "config", "a:b", "-k", "exe", "-o", "/w"])
                .unwrap();
        let ProjectCommand::Config(c) = args.command else {
            panic!("Incorrect subcommand parsed for 'config'");
        };
        assert!(c.spec.to_spec(&cfg).is_err());
    }
}
