//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  A missing file
//! means "use defaults"; a present but unreadable or invalid one is an
//! error, never silently replaced.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ENVIROCONTROL_CONFIG";
/// Environment variable overriding `link.port`.
pub const PORT_ENV: &str = "ENVIROCONTROL_PORT";

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        if !self.path.exists() {
            info!("config: {} not found, using defaults", self.path.display());
            return Ok(SystemConfig::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let config: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text =
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        info!("config: saved {}", self.path.display());
        Ok(())
    }
}

/// Resolve the startup configuration.
///
/// The file comes from `cli_path`, else `ENVIROCONTROL_CONFIG`; with
/// neither, defaults apply.  `ENVIROCONTROL_PORT` then overrides the
/// serial port.
pub fn resolve(cli_path: Option<&str>) -> Result<SystemConfig, ConfigError> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    let mut config = match cli_path.or(env_path.as_deref()) {
        Some(path) => JsonConfigFile::new(path).load()?,
        None => SystemConfig::default(),
    };
    if let Ok(port) = std::env::var(PORT_ENV) {
        info!("config: link.port overridden to {}", port);
        config.link.port = port;
    }
    Ok(config)
}
