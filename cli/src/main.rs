//! # WizGen Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the WizGen CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command group is a variant of the `Commands` enum
//! - The scaffold engine (`scaffold`) knows nothing about the command line;
//!   commands build a `ProjectSpec` and hand it over
//! - All errors are propagated to this level and printed once
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! wizgen --help
//!
//! # Scaffold a DLL with increased verbosity
//! wizgen -vv project new mylib --kind dll
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` wins when set)
//! 3. Route to the command handler
//! 4. Print any error as a single `Error: ...` line and exit with status 1
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups (project)
mod common; // Shared filesystem helpers
mod core; // Core infrastructure (errors, config, templating)
mod scaffold; // Scaffold engine (spec, manifests, build configurations, persistence)

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "wizgen",
    about = "WizGen: project scaffolding for the sanos operating system",
    long_about = "Create sanos projects (executables, DLLs, static libraries, kernel drivers\n\
                  and kernel modules) from a template set, with debug/release build\n\
                  configurations and an optional boot-disk image project.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "p")]
    Project(commands::project::ProjectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Project(args) => commands::project::handle_project(args),
    };

    if let Err(e) = command_result {
        // Full chain for -vv; the single `Error:` line is what users see.
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
