//! CLI settings resolution.
//!
//! Priority order: CLI flags > environment variables (including `.env`) > defaults.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use keysign_core::DEFAULT_KEY_PROPERTIES;

/// Environment variable naming the Android project root.
pub const PROJECT_ROOT_ENV: &str = "KEYSIGN_PROJECT_ROOT";
/// Environment variable overriding the properties file name.
pub const PROPERTIES_FILE_ENV: &str = "KEYSIGN_PROPERTIES_FILE";

/// Resolved settings after applying priority rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory the properties file and relative keystore paths are resolved against.
    pub project_root: PathBuf,
    /// Properties file name, relative to `project_root`.
    pub properties_file: String,
}

impl Settings {
    /// Full path of the properties file.
    pub fn properties_path(&self) -> PathBuf {
        self.project_root.join(&self.properties_file)
    }
}

/// Resolve settings by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--project-root`, `--file`)
/// 2. Environment variables (`KEYSIGN_PROJECT_ROOT`, `KEYSIGN_PROPERTIES_FILE`)
/// 3. Defaults (current directory, `key.properties`)
pub fn resolve_settings(root_flag: Option<&Path>, file_flag: Option<&str>) -> Result<Settings> {
    let mut project_root: Option<PathBuf> = None;
    let mut properties_file = DEFAULT_KEY_PROPERTIES.to_string();

    // Apply environment variables (lowest explicit priority)
    if let Some(root) = non_empty_env(PROJECT_ROOT_ENV) {
        project_root = Some(PathBuf::from(root));
    }
    if let Some(file) = non_empty_env(PROPERTIES_FILE_ENV) {
        properties_file = file;
    }

    // Apply CLI flags (highest priority)
    if let Some(root) = root_flag {
        project_root = Some(root.to_path_buf());
    }
    if let Some(file) = file_flag {
        properties_file = file.to_string();
    }

    let project_root = match project_root {
        Some(root) => root,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    validate_settings(&project_root, &properties_file)?;

    Ok(Settings {
        project_root,
        properties_file,
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn validate_settings(project_root: &Path, properties_file: &str) -> Result<()> {
    if !project_root.is_dir() {
        bail!("Project root {} is not a directory", project_root.display());
    }

    if properties_file.trim().is_empty() {
        bail!("Properties file name must not be empty");
    }

    Ok(())
}
