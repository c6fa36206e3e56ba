use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::physics::{BoxParams, DEFAULT_LENGTH, MIN_LEVEL};
use crate::{Error, Result};

/// Main configuration for the visualizer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Control values shown when the page first loads
    pub initial: InitialState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub level: u32,
    pub length: f64,
    pub normalized: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            length: DEFAULT_LENGTH,
            normalized: false,
        }
    }
}

impl Config {
    /// Load config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject initial control values the page could never produce
    pub fn validate(&self) -> Result<()> {
        let initial = &self.initial;
        BoxParams::new(initial.level, initial.length, initial.normalized)
            .map_err(|e| Error::Config(format!("initial state: {e}")))?;
        Ok(())
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_server(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
        assert_eq!(config.initial.level, 1);
        assert_eq!(config.initial.length, 1.0);
        assert!(!config.initial.normalized);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "server": { "port": 8080 }, "initial": { "level": 3 } }"#)
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.server_addr(), "127.0.0.1:8080");
        assert_eq!(config.initial.level, 3);
        assert_eq!(config.initial.length, 1.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.initial.normalized = true;
        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(Error::Io(_))));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "initial": { "length": 0.0 } }"#).unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));

        std::fs::write(&path, r#"{ "initial": { "level": 11 } }"#).unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_server(Some("0.0.0.0".into()), None);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        let config = config.with_server(None, Some(9000));
        assert_eq!(config.server_addr(), "0.0.0.0:9000");
    }
}
