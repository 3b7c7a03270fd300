use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::SettingsFile;

pub(crate) const APP_DIR: &str = "ampy-tui";

fn app_file(name: &str, fallback: &str) -> Result<PathBuf> {
    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_DIR);
        dir.push(name);
        return Ok(dir);
    }
    let mut path = std::env::current_dir().context("current dir")?;
    path.push(fallback);
    Ok(path)
}

pub(crate) fn config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path),
        None => app_file("config.json", "ampy-tui-config.json"),
    }
}

pub(crate) fn log_path() -> Result<PathBuf> {
    app_file("ampy-tui.log", "ampy-tui.log")
}

pub(crate) fn debug_log_path() -> Result<PathBuf> {
    app_file("debug.log", "ampy-tui-debug.log")
}

/// Settings read at startup. `fallback` explains why defaults are in use.
#[derive(Debug)]
pub(crate) struct LoadedSettings {
    pub(crate) settings: SettingsFile,
    pub(crate) fallback: Option<String>,
}

pub(crate) fn load_settings(path: &Path) -> LoadedSettings {
    match read_settings(path) {
        Ok(settings) => LoadedSettings {
            settings,
            fallback: None,
        },
        Err(err) => LoadedSettings {
            settings: SettingsFile::default(),
            fallback: Some(format!("{err:#}")),
        },
    }
}

pub(crate) fn read_settings(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let settings = serde_json::from_str(&content).context("parse settings file")?;
    Ok(settings)
}

pub(crate) fn save_settings(path: &Path, settings: &SettingsFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create config dir")?;
    }
    let content = serde_json::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).context("write settings file")?;
    Ok(())
}
