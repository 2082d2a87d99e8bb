//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::errors::DeviceError;
use crate::services::device_service::DeviceService;
use crate::storage::settings::StorageSettings;
use crate::storage::store::open_store;

/// Main application state
pub struct AppState {
    /// Device lifecycle service
    pub devices: Arc<DeviceService>,
}

impl AppState {
    /// Initialize application state
    pub async fn init(storage: &StorageSettings) -> Result<Self, DeviceError> {
        info!(backend = ?storage.backend, "Initializing application state...");

        let store = open_store(storage).await?;
        let devices = Arc::new(DeviceService::new(store));

        Ok(Self { devices })
    }
}
