//! Record store interface

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DeviceResult;
use crate::models::device::{Device, DeviceState};
use crate::storage::json_file::JsonFileDeviceStore;
use crate::storage::memory::MemoryDeviceStore;
use crate::storage::settings::{StorageBackend, StorageSettings};

/// Keyed storage for device records.
///
/// Implementations serialize writes to the same id; the lifecycle service
/// performs its own read-check-write on top of these primitives.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Find a device by ID
    async fn find_by_id(&self, id: Uuid) -> DeviceResult<Option<Device>>;

    /// Insert a new device. Fails if the ID is already taken.
    async fn insert(&self, device: Device) -> DeviceResult<()>;

    /// Replace an existing device. Fails with `NotFound` if absent.
    async fn update(&self, device: Device) -> DeviceResult<()>;

    /// Remove a device, returning whether it existed
    async fn remove(&self, id: Uuid) -> DeviceResult<bool>;

    /// All devices
    async fn scan_all(&self) -> DeviceResult<Vec<Device>>;

    /// Devices with an exactly matching brand
    async fn scan_by_brand(&self, brand: &str, case_insensitive: bool)
        -> DeviceResult<Vec<Device>>;

    /// Devices in the given state
    async fn scan_by_state(&self, state: DeviceState) -> DeviceResult<Vec<Device>>;
}

/// Open the store selected by the storage settings
pub async fn open_store(settings: &StorageSettings) -> DeviceResult<Arc<dyn DeviceStore>> {
    match settings.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryDeviceStore::new())),
        StorageBackend::File => {
            let store = JsonFileDeviceStore::open(&settings.path).await?;
            Ok(Arc::new(store))
        }
    }
}

pub(crate) fn brand_matches(device_brand: &str, brand: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        device_brand.to_lowercase() == brand.to_lowercase()
    } else {
        device_brand == brand
    }
}

/// Order scan results by creation time, then ID
pub(crate) fn sort_devices(mut devices: Vec<Device>) -> Vec<Device> {
    devices.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    devices
}
