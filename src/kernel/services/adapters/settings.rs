//! 配置与数据目录
//!
//! Everything lives under `<cache>/.workspace-explorer/`:
//! - `settings.json`: [`ExplorerConfig`], written with defaults on first use
//! - `storage.json`: client-local key/value state
//! - `logs/`: daily log files

use std::path::{Path, PathBuf};

use crate::kernel::services::ports::ExplorerConfig;

const APP_DIR: &str = ".workspace-explorer";
const SETTINGS_FILE: &str = "settings.json";
const STORAGE_FILE: &str = "storage.json";
const LOG_DIR: &str = "logs";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine the cache directory")]
    NoCacheDir,
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid settings: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn get_app_dir() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(APP_DIR))
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_app_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub fn get_storage_path() -> Option<PathBuf> {
    get_app_dir().map(|dir| dir.join(STORAGE_FILE))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_dir().map(|dir| dir.join(LOG_DIR))
}

pub fn ensure_log_dir() -> Result<PathBuf, ConfigError> {
    let dir = get_log_dir().ok_or(ConfigError::NoCacheDir)?;
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, e))?;
    Ok(dir)
}

/// Writes the default config to `path` unless a file is already there.
pub fn ensure_settings_file(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(&ExplorerConfig::default()).map_err(|e| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;
    tracing::info!(path = %path.display(), "wrote default settings");
    Ok(())
}

pub fn load_config(path: &Path) -> Result<ExplorerConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Config at `path`, or the default location when `None`; created with
/// defaults when missing.
pub fn load_or_init_config(path: Option<&Path>) -> Result<ExplorerConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => get_settings_path().ok_or(ConfigError::NoCacheDir)?,
    };
    ensure_settings_file(&path)?;
    load_config(&path)
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
