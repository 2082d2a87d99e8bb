//! Device lifecycle service
//!
//! Owns the business rules for device records. Every operation is a single
//! read-then-conditionally-write against the store; no state is kept
//! between calls.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{DeviceError, DeviceResult};
use crate::models::device::{Device, DeviceChanges, DeviceState, LockRule, NewDevice, UpdateMode};
use crate::storage::store::DeviceStore;

pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    /// Create a device. State defaults to `Available`.
    pub async fn create(&self, input: NewDevice) -> DeviceResult<Device> {
        input.validate()?;

        let device = Device::new(input);
        debug!(device_id = %device.id, brand = %device.brand, "Creating device");

        self.store.insert(device.clone()).await?;

        info!(device_id = %device.id, state = %device.state, "Device created");
        Ok(device)
    }

    pub async fn get_by_id(&self, id: Uuid) -> DeviceResult<Device> {
        debug!(device_id = %id, "Getting device");
        self.store
            .find_by_id(id)
            .await?
            .ok_or(DeviceError::NotFound(id))
    }

    pub async fn get_all(&self) -> DeviceResult<Vec<Device>> {
        let devices = self.store.scan_all().await?;
        debug!(count = devices.len(), "Listed devices");
        Ok(devices)
    }

    /// Devices whose brand matches, ignoring case
    pub async fn get_by_brand(&self, brand: &str) -> DeviceResult<Vec<Device>> {
        let devices = self.store.scan_by_brand(brand, true).await?;
        debug!(brand = %brand, count = devices.len(), "Listed devices by brand");
        Ok(devices)
    }

    pub async fn get_by_state(&self, state: DeviceState) -> DeviceResult<Vec<Device>> {
        let devices = self.store.scan_by_state(state).await?;
        debug!(state = %state, count = devices.len(), "Listed devices by state");
        Ok(devices)
    }

    /// Apply `changes` to a device.
    ///
    /// While the device is in use only `state` may change: in `Full` mode a
    /// `name`/`brand` that differs from the stored value is rejected, in
    /// `Partial` mode any supplied `name`/`brand` is. Rejections carry the
    /// unchanged record.
    pub async fn update(
        &self,
        id: Uuid,
        changes: DeviceChanges,
        mode: UpdateMode,
    ) -> DeviceResult<Device> {
        changes.validate()?;

        let current = self.get_by_id(id).await?;

        let updated = current
            .apply_changes(&changes, mode)
            .map_err(|rule| Self::rejected(rule, current.clone()))?;

        if updated == current {
            debug!(device_id = %id, ?mode, "Update left device unchanged");
            return Ok(current);
        }

        self.store.update(updated.clone()).await?;

        info!(device_id = %id, ?mode, state = %updated.state, "Device updated");
        Ok(updated)
    }

    /// Delete a device that is not in use
    pub async fn delete(&self, id: Uuid) -> DeviceResult<()> {
        let current = self.get_by_id(id).await?;

        current
            .check_deletable()
            .map_err(|rule| Self::rejected(rule, current.clone()))?;

        if !self.store.remove(id).await? {
            return Err(DeviceError::NotFound(id));
        }

        info!(device_id = %id, "Device deleted");
        Ok(())
    }

    fn rejected(rule: LockRule, device: Device) -> DeviceError {
        warn!(device_id = %device.id, rule = rule.as_str(), "Device mutation rejected");
        DeviceError::InUse {
            rule,
            device: Box::new(device),
        }
    }
}
