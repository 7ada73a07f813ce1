//! # WizGen Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the settings that seed a `ProjectSpec` when the user does
//! not pass them on the command line: where the template set lives, where the
//! SDK is installed, and default project flags.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Environment overrides (`WIZGEN_TEMPLATES_DIR`, `WIZGEN_SDK_PATH`)
//! 2. Project-specific `.wizgen.toml` in current directory or ancestors
//! 3. User-specific `<config dir>/wizgen/config.toml`
//! 4. Default values defined in the code
//!
//! Paths are expanded (`~` to home directory) and validated before use.
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let template_root = PathBuf::from(&cfg.templates.directory);
//! let sdk = PathBuf::from(&cfg.sdk.path);
//! ```
//!
use crate::core::error::{WizardError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable overriding the template root.
pub const TEMPLATES_DIR_ENV: &str = "WIZGEN_TEMPLATES_DIR";
/// Environment variable overriding the SDK root.
pub const SDK_PATH_ENV: &str = "WIZGEN_SDK_PATH";

const PROJECT_CONFIG_FILENAME: &str = ".wizgen.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub sdk: SdkConfig,
    #[serde(default)]
    pub defaults: ProjectDefaults,
}

/// Location of the template set (`Templates.inf`, `BootDisk.inf`, template files).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default = "default_templates_dir")]
    pub directory: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            directory: default_templates_dir(),
        }
    }
}

/// SDK installation used for include/library directories and boot-disk tools.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SdkConfig {
    #[serde(default = "default_sdk_path")]
    pub path: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            path: default_sdk_path(),
        }
    }
}

/// Default project flags, applied unless the command line says otherwise.
/// `None` means the file did not set the flag, so a lower layer decides.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectDefaults {
    #[serde(default)]
    pub use_clib: Option<bool>,
    #[serde(default)]
    pub extended_layout: Option<bool>,
    /// Extra preprocessor defines appended after the built-in ones.
    #[serde(default)]
    pub defines: Vec<String>,
}

fn default_templates_dir() -> String {
    "~/.config/wizgen/templates".to_string()
}
fn default_sdk_path() -> String {
    "~/sanos".to_string()
}

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    apply_env_overrides(&mut merged_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "WizGen", "wizgen") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

/// Walks from `start` towards the filesystem root looking for `.wizgen.toml`.
/// The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in defaults. Flags
/// set explicitly in the project file win even when they are `false`.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.templates.directory = if project_cfg.templates.directory != default_templates_dir() {
        project_cfg.templates.directory
    } else {
        user.templates.directory
    };
    merged.sdk.path = if project_cfg.sdk.path != default_sdk_path() {
        project_cfg.sdk.path
    } else {
        user.sdk.path
    };
    merged.defaults.use_clib = project_cfg.defaults.use_clib.or(user.defaults.use_clib);
    merged.defaults.extended_layout = project_cfg
        .defaults
        .extended_layout
        .or(user.defaults.extended_layout);
    merged.defaults.defines = if !project_cfg.defaults.defines.is_empty() {
        project_cfg.defaults.defines
    } else {
        user.defaults.defines
    };
    merged
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(dir) = env::var(TEMPLATES_DIR_ENV) {
        debug!("{} overrides template directory: {}", TEMPLATES_DIR_ENV, dir);
        config.templates.directory = dir;
    }
    if let Ok(sdk) = env::var(SDK_PATH_ENV) {
        debug!("{} overrides SDK path: {}", SDK_PATH_ENV, sdk);
        config.sdk.path = sdk;
    }
}

fn expand_config_paths(config: &mut Config) {
    config.templates.directory = shellexpand::tilde(&config.templates.directory).into_owned();
    config.sdk.path = shellexpand::tilde(&config.sdk.path).into_owned();
    debug!(
        "Expanded paths: templates='{}', sdk='{}'",
        config.templates.directory, config.sdk.path
    );
}

fn validate_config(config: &Config) -> Result<()> {
    let tpl_dir = PathBuf::from(&config.templates.directory);
    if !tpl_dir.exists() {
        warn!(
            "Configured template directory '{}' does not exist.",
            tpl_dir.display()
        );
    } else if !tpl_dir.is_dir() {
        return Err(anyhow!(WizardError::Config(format!(
            "Configured template path '{}' exists but is not a directory.",
            tpl_dir.display()
        ))));
    }
    for define in &config.defaults.defines {
        if define.trim().is_empty() {
            return Err(anyhow!(WizardError::Config(
                "Default preprocessor defines cannot contain empty entries.".to_string()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [templates]
            directory = "/opt/wizgen/templates"

            [sdk]
            path = "~/sdk"

            [defaults]
            use_clib = true
            defines = ["TRACE", "FAST_IO"]
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.templates.directory, "/opt/wizgen/templates");
        assert_eq!(config.sdk.path, "~/sdk"); // Not yet expanded
        assert_eq!(config.defaults.use_clib, Some(true));
        assert_eq!(config.defaults.extended_layout, None);
        assert_eq!(config.defaults.defines, vec!["TRACE", "FAST_IO"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[sdk]\nroot = \"/x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            templates: TemplatesConfig {
                directory: "~/tpl".to_string(),
            },
            sdk: SdkConfig {
                path: "/absolute/sdk".to_string(),
            },
            ..Default::default()
        };
        expand_config_paths(&mut config);

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(config.templates.directory, home_dir.join("tpl").to_string_lossy());
        assert_eq!(config.sdk.path, "/absolute/sdk");
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let user = Config {
            sdk: SdkConfig {
                path: "/user/sdk".into(),
            },
            defaults: ProjectDefaults {
                defines: vec!["USER".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let project = Config {
            templates: TemplatesConfig {
                directory: "/project/tpl".into(),
            },
            defaults: ProjectDefaults {
                extended_layout: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.templates.directory, "/project/tpl");
        assert_eq!(merged.sdk.path, "/user/sdk");
        assert_eq!(merged.defaults.extended_layout, Some(true));
        assert_eq!(merged.defaults.use_clib, None);
        assert_eq!(merged.defaults.defines, vec!["USER"]);
    }

    #[test]
    fn test_merge_project_false_overrides_user_true() {
        let user: Config =
            toml::from_str("[defaults]\nuse_clib = true\nextended_layout = true\n").unwrap();
        let project: Config = toml::from_str("[defaults]\nuse_clib = false\n").unwrap();

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.defaults.use_clib, Some(false));
        // Not set in the project file, so the user value stands.
        assert_eq!(merged.defaults.extended_layout, Some(true));
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        let found = find_project_config_path(&nested);
        assert_eq!(found, Some(root.path().join(PROJECT_CONFIG_FILENAME)));
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let root = tempdir().unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        assert_eq!(find_project_config_path(&repo), None);
    }

    #[test]
    fn test_validate_config_template_path_is_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();

        let config = Config {
            templates: TemplatesConfig {
                directory: file_path.to_string_lossy().to_string(),
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is not a directory"));
    }

    #[test]
    fn test_validate_config_empty_define() {
        let config = Config {
            defaults: ProjectDefaults {
                defines: vec!["OK".into(), "  ".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
