//! In-memory device store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{DeviceError, DeviceResult};
use crate::models::device::{Device, DeviceState};
use crate::storage::store::{brand_matches, sort_devices, DeviceStore};

/// Device store backed by a `HashMap`. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryDeviceStore {
    entries: RwLock<HashMap<Uuid, Device>>,
}

impl MemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored devices
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filter(&self, predicate: impl Fn(&Device) -> bool) -> Vec<Device> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        sort_devices(entries.values().filter(|&d| predicate(d)).cloned().collect())
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    async fn find_by_id(&self, id: Uuid) -> DeviceResult<Option<Device>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&id).cloned())
    }

    async fn insert(&self, device: Device) -> DeviceResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.contains_key(&device.id) {
            return Err(DeviceError::Storage(format!(
                "Device {} already exists",
                device.id
            )));
        }
        entries.insert(device.id, device);
        Ok(())
    }

    async fn update(&self, device: Device) -> DeviceResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(&device.id) {
            Some(entry) => {
                *entry = device;
                Ok(())
            }
            None => Err(DeviceError::NotFound(device.id)),
        }
    }

    async fn remove(&self, id: Uuid) -> DeviceResult<bool> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(&id).is_some())
    }

    async fn scan_all(&self) -> DeviceResult<Vec<Device>> {
        Ok(self.filter(|_| true))
    }

    async fn scan_by_brand(
        &self,
        brand: &str,
        case_insensitive: bool,
    ) -> DeviceResult<Vec<Device>> {
        Ok(self.filter(|d| brand_matches(&d.brand, brand, case_insensitive)))
    }

    async fn scan_by_state(&self, state: DeviceState) -> DeviceResult<Vec<Device>> {
        Ok(self.filter(|d| d.state == state))
    }
}
