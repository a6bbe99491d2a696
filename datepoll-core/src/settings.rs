//! Server settings.
//!
//! Layered, lowest priority first: built-in defaults, the TOML file at
//! `~/.config/datepoll/config.toml` (or an explicit path), then `DATEPOLL_*`
//! environment variables. Command line flags are applied on top by the
//! server binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{DatepollError, DatepollResult};

static DEFAULT_ADDRESS: &str = "127.0.0.1:4096";
static DEFAULT_LOG: &str = "info";

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("datepoll").join("events.json"))
        .unwrap_or_else(|| PathBuf::from("events.json"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub address: SocketAddr,
    pub data_file: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `datepoll_server=debug`
    pub log: String,
}

impl Settings {
    pub fn config_path() -> DatepollResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DatepollError::Config("Could not determine config directory".into()))?
            .join("datepoll");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the default config file location.
    pub fn load() -> DatepollResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings using `path` as the config file. A missing file is fine.
    pub fn load_from(path: &Path) -> DatepollResult<Self> {
        Self::builder(path)
            .add_source(Environment::with_prefix("DATEPOLL"))
            .build()
            .map_err(|e| DatepollError::Config(e.to_string()))?
            .try_deserialize::<Settings>()
            .map_err(|e| DatepollError::Config(e.to_string()))
            .map(Settings::expanded)
    }

    fn builder(path: &Path) -> config::ConfigBuilder<config::builder::DefaultState> {
        let data_file = default_data_file().to_string_lossy().into_owned();

        // set_default only fails for keys that cannot be parsed, and these are literals
        Config::builder()
            .set_default("address", DEFAULT_ADDRESS)
            .and_then(|b| b.set_default("data_file", data_file))
            .and_then(|b| b.set_default("log", DEFAULT_LOG))
            .unwrap_or_else(|_| Config::builder())
            .add_source(File::from(path).required(false))
    }

    /// Expand a leading `~` in the data file path.
    fn expanded(mut self) -> Self {
        let raw = self.data_file.to_string_lossy().into_owned();
        self.data_file = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        self
    }

    /// Render as TOML, for `--print-config`.
    pub fn to_toml(&self) -> DatepollResult<String> {
        toml::to_string_pretty(self).map_err(|e| DatepollError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(settings.address, DEFAULT_ADDRESS.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.log, "info");
        assert!(settings.data_file.ends_with("events.json"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "address = \"0.0.0.0:8080\"\ndata_file = \"/srv/datepoll/db.json\"\nlog = \"debug\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.address, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.data_file, PathBuf::from("/srv/datepoll/db.json"));
        assert_eq!(settings.log, "debug");
    }

    #[test]
    fn test_tilde_is_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_file = \"~/datepoll.json\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert!(!settings.data_file.starts_with("~"));
        assert!(settings.data_file.ends_with("datepoll.json"));
    }

    #[test]
    fn test_invalid_address_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "address = \"not an address\"\n").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(DatepollError::Config(_))));
    }

    #[test]
    fn test_to_toml() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("none.toml")).unwrap();
        let rendered = settings.to_toml().unwrap();

        assert!(rendered.contains("address = \"127.0.0.1:4096\""));
    }
}
