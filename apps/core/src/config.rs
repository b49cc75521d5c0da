use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;

const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_SEARCH_THRESHOLD: usize = 1_000_000;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("toml serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(skip)]
    pub config_path: PathBuf,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
            engine: EngineConfig::default(),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    std::env::temp_dir().join("rover")
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.engine.search_threshold > MAX_SEARCH_THRESHOLD {
        return Err(format!(
            "search_threshold must be at most {MAX_SEARCH_THRESHOLD}"
        ));
    }

    if !LOG_LEVELS.contains(&cfg.log_level.to_ascii_lowercase().as_str()) {
        return Err(format!(
            "log_level '{}' is not one of {}",
            cfg.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

/// Loads the config at `path` (or the default location). A missing file yields
/// defaults; `.json` and `.json5` files are read as JSON5, anything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        parse(&raw, &config_path)?
    } else {
        Config::default()
    };
    config.config_path = config_path;

    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") | Some("json5") => Ok(json5::from_str(raw)?),
        _ => Ok(toml::from_str(raw)?),
    }
}
