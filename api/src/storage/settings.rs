//! Settings file management

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::DeviceError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    /// Directory for rolling log files. Stdout only when absent.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Record store configuration
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults if it does not exist
    pub async fn load(file: &File) -> Result<Self, DeviceError> {
        if !file.exists().await {
            return Ok(Self::default());
        }
        file.read_json().await.map_err(|e| {
            DeviceError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })
    }

    /// Apply `--key=value` command line overrides
    pub fn apply_overrides(&mut self, args: &HashMap<String, String>) -> Result<(), DeviceError> {
        if let Some(host) = args.get("host") {
            self.server.host = host.clone();
        }
        if let Some(port) = args.get("port") {
            self.server.port = port
                .parse()
                .map_err(|_| DeviceError::ConfigError(format!("Invalid port: {}", port)))?;
        }
        if let Some(level) = args.get("log-level") {
            self.log_level = level.parse().map_err(DeviceError::ConfigError)?;
        }
        if let Some(json) = args.get("log-json") {
            self.log_json = json == "true";
        }
        if let Some(dir) = args.get("log-dir") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(backend) = args.get("storage") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = args.get("data") {
            self.storage.path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

impl std::str::FromStr for StorageBackend {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "json" => Ok(StorageBackend::File),
            _ => Err(DeviceError::ConfigError(format!(
                "Invalid storage backend: {}",
                s
            ))),
        }
    }
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data file used by the `file` backend
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("devices.json")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: default_data_path(),
        }
    }
}
