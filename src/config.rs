use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::system::history::DEFAULT_CAPACITY;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tick interval for aggregate sampling.
    pub refresh_rate_ms: u64,
    /// Rolling history length for the cpu/memory series.
    pub history_capacity: usize,
    /// Mount point reported as "disk usage".
    pub disk_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            history_capacity: DEFAULT_CAPACITY,
            disk_path: "/".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procdash").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
