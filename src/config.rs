use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::Priority;

/// User preferences, read from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Priority used by `add` when none is given.
    pub default_priority: Priority,
    /// Estimate used by `add` when none is given.
    pub default_minutes: i64,
    /// Wrap width of the title column.
    pub title_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_priority: Priority::Medium,
            default_minutes: 30,
            title_width: 40,
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "taskboard", "taskboard")
}

fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load settings from `path`, or from the default location when no
/// path is given. A missing file means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_file) {
        Some(path) => path,
        None => return Ok(Settings::default()),
    };

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}.", path.display()))?;
    let settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}.", path.display()))?;
    info!("loaded settings from {}", path.display());
    Ok(settings)
}
