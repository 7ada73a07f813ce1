//! # WizGen Project Config Command
//!
//! File: cli/src/commands/project/config.rs
//!
//! Implements `wizgen project config`: derives the debug and release build
//! configurations for the described project and prints them as TOML. With
//! `--boot-disk` the boot-disk build steps are printed too. Nothing is written
//! to disk.
//!
use super::SpecArgs;
use crate::core::config;
use crate::core::error::Result;
use crate::scaffold::boot_disk::{self, CustomBuildStep};
use crate::scaffold::build_config::{self, BuildConfiguration, Variant};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;

/// Arguments for `wizgen project config`.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize, Debug)]
struct ConfigReport {
    debug: BuildConfiguration,
    release: BuildConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    boot_disk: Option<BootDiskSteps>,
}

#[derive(Serialize, Debug)]
struct BootDiskSteps {
    debug: CustomBuildStep,
    release: CustomBuildStep,
}

pub fn handle_config(args: ConfigArgs) -> Result<()> {
    info!("Handling project config command...");
    let cfg = config::load_config().context("Failed to load WizGen configuration")?;
    let spec = args.spec.to_spec(&cfg)?;

    let configurations = build_config::build(&spec);
    let boot_disk = spec.flags().create_boot_disk.then(|| BootDiskSteps {
        debug: boot_disk::build_step(&spec, &configurations, Variant::Debug),
        release: boot_disk::build_step(&spec, &configurations, Variant::Release),
    });
    let report = ConfigReport {
        debug: configurations.debug,
        release: configurations.release,
        boot_disk,
    };

    let rendered = toml::to_string_pretty(&report)
        .context("Failed to format build configurations as TOML")?;
    println!("# Build configurations for '{}' ({})", spec.name(), spec.kind());
    print!("{}", rendered);
    Ok(())
}
