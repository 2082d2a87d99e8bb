//! Application configuration options

use std::time::Duration;

use crate::storage::layout::StorageLayout;
use crate::storage::settings::{Settings, StorageSettings};

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Record store configuration
    pub storage: StorageSettings,

    /// Server configuration
    pub server: ServerOptions,
}

impl AppOptions {
    /// Build options from a settings file, resolving paths against `layout`
    pub fn from_settings(settings: &Settings, layout: &StorageLayout) -> Self {
        let mut storage = settings.storage.clone();
        storage.path = layout.resolve(storage.path);

        Self {
            storage,
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            ..Default::default()
        }
    }
}

/// Lifecycle options for the service
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
