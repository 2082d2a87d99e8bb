//! JSON file backed device store

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{DeviceError, DeviceResult};
use crate::filesys::file::File;
use crate::models::device::{Device, DeviceState};
use crate::storage::store::{brand_matches, sort_devices, DeviceStore};

/// On-disk document
#[derive(Debug, Default, Serialize, Deserialize)]
struct DeviceDocument {
    #[serde(default)]
    devices: Vec<Device>,
}

/// Device store persisted as a single JSON document.
///
/// Every mutation rewrites the document before the in-memory map is
/// committed, so a failed write leaves both unchanged.
pub struct JsonFileDeviceStore {
    file: File,
    entries: Mutex<HashMap<Uuid, Device>>,
}

impl JsonFileDeviceStore {
    /// Open the store, loading existing records. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> DeviceResult<Self> {
        let file = File::new(path);

        let document = if file.exists().await {
            file.read_json::<DeviceDocument>().await?
        } else {
            DeviceDocument::default()
        };

        let entries: HashMap<Uuid, Device> = document
            .devices
            .into_iter()
            .map(|device| (device.id, device))
            .collect();

        info!(
            path = %file.path().display(),
            count = entries.len(),
            "Opened device store"
        );

        Ok(Self {
            file,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<Uuid, Device>) -> DeviceResult<()> {
        let document = DeviceDocument {
            devices: sort_devices(entries.values().cloned().collect()),
        };
        self.file.write_json(&document).await.map_err(|e| {
            DeviceError::Storage(format!(
                "Failed to write {}: {}",
                self.file.path().display(),
                e
            ))
        })?;
        debug!(count = document.devices.len(), "Persisted device store");
        Ok(())
    }

    async fn filter(&self, predicate: impl Fn(&Device) -> bool) -> Vec<Device> {
        let entries = self.entries.lock().await;
        sort_devices(entries.values().filter(|&d| predicate(d)).cloned().collect())
    }
}

#[async_trait]
impl DeviceStore for JsonFileDeviceStore {
    async fn find_by_id(&self, id: Uuid) -> DeviceResult<Option<Device>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&id).cloned())
    }

    async fn insert(&self, device: Device) -> DeviceResult<()> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&device.id) {
            return Err(DeviceError::Storage(format!(
                "Device {} already exists",
                device.id
            )));
        }

        let mut next = entries.clone();
        next.insert(device.id, device);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn update(&self, device: Device) -> DeviceResult<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(&device.id) {
            return Err(DeviceError::NotFound(device.id));
        }

        let mut next = entries.clone();
        next.insert(device.id, device);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> DeviceResult<bool> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(&id) {
            return Ok(false);
        }

        let mut next = entries.clone();
        next.remove(&id);
        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }

    async fn scan_all(&self) -> DeviceResult<Vec<Device>> {
        Ok(self.filter(|_| true).await)
    }

    async fn scan_by_brand(
        &self,
        brand: &str,
        case_insensitive: bool,
    ) -> DeviceResult<Vec<Device>> {
        Ok(self
            .filter(|d| brand_matches(&d.brand, brand, case_insensitive))
            .await)
    }

    async fn scan_by_state(&self, state: DeviceState) -> DeviceResult<Vec<Device>> {
        Ok(self.filter(|d| d.state == state).await)
    }
}
