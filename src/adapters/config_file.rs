//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a pretty-printed JSON file.  `save`
//! validates first and writes through a sibling temp file + rename so a
//! crash never leaves a half-written config behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::GatewayConfig;

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
    fn load(&self) -> Result<GatewayConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => return Err(ConfigError::Io(e.to_string())),
        };
        let cfg: GatewayConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        info!("CONFIG: loaded {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &GatewayConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ConfigError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ConfigError::Io(e.to_string()))?;
        info!("CONFIG: saved {}", self.path.display());
        Ok(())
    }
}
