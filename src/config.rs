//! User settings from `$XDG_CONFIG_HOME/lzlog/config.json` plus environment overrides.

use serde::{Deserialize, Serialize};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::refresh_task::DEFAULT_REFRESH_INTERVAL;
use crate::theme::Theme;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Redraw interval while a branch is still loading.
    pub refresh_interval_ms: u64,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `lzlog=debug`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
            theme: Theme::default(),
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    let home = env::home_dir()?;
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home.join(".config"));
    Some(base.join("lzlog").join("config.json"))
}

impl Config {
    /// Load the config file, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match config_file_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = var("LZLOG_REFRESH_MS").and_then(|v| v.trim().parse().ok()) {
            self.refresh_interval_ms = ms;
        }
        if let Some(path) = var("LZLOG_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(filter) = var("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
