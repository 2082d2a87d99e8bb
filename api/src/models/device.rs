//! Device model and mutation rules

use std::fmt;

use chrono::{DateTime, Utc};
use openapi_server::DeviceResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DeviceError;

/// Maximum length of `name` and `brand`, in characters
pub const MAX_LABEL_LEN: usize = 100;

/// A managed device record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device ID, assigned at creation
    pub id: Uuid,

    /// Device name
    pub name: String,

    /// Device brand
    pub brand: String,

    /// Lifecycle state
    pub state: DeviceState,

    /// Creation timestamp, never modified
    pub created_at: DateTime<Utc>,
}

/// Device lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    #[default]
    Available,

    /// Locks `name`/`brand` and blocks deletion
    InUse,

    Inactive,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Available => "available",
            DeviceState::InUse => "in_use",
            DeviceState::Inactive => "inactive",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceState {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(DeviceState::Available),
            "in_use" | "inuse" | "in-use" => Ok(DeviceState::InUse),
            "inactive" => Ok(DeviceState::Inactive),
            _ => Err(DeviceError::Validation(format!(
                "Invalid device state: {}",
                s
            ))),
        }
    }
}

/// Business rule that blocked a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRule {
    /// `name` and `brand` cannot change while the device is in use
    FieldLock,

    /// A device in use cannot be deleted
    DeleteLock,
}

impl LockRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockRule::FieldLock => "field_lock",
            LockRule::DeleteLock => "delete_lock",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            LockRule::FieldLock => "name and brand cannot change while the device is in use",
            LockRule::DeleteLock => "device cannot be deleted while it is in use",
        }
    }
}

impl fmt::Display for LockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Input for creating a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub brand: String,
    pub state: Option<DeviceState>,
}

impl NewDevice {
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn validate(&self) -> Result<(), DeviceError> {
        validate_label("name", &self.name)?;
        validate_label("brand", &self.brand)
    }
}

/// Fields supplied by an update. `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

impl DeviceChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn validate(&self) -> Result<(), DeviceError> {
        if let Some(name) = &self.name {
            validate_label("name", name)?;
        }
        if let Some(brand) = &self.brand {
            validate_label("brand", brand)?;
        }
        Ok(())
    }
}

/// How an update treats the supplied fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Caller sends the desired field set; omitted fields keep their value
    Full,

    /// Only supplied fields are considered
    Partial,
}

impl Device {
    /// Create a new device with a fresh ID and creation timestamp
    pub fn new(input: NewDevice) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            brand: input.brand,
            state: input.state.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.state == DeviceState::InUse
    }

    /// Whether `changes` would touch `name` or `brand` under `mode`
    fn touches_locked_fields(&self, changes: &DeviceChanges, mode: UpdateMode) -> bool {
        match mode {
            UpdateMode::Partial => changes.name.is_some() || changes.brand.is_some(),
            UpdateMode::Full => {
                let name = changes.name.as_deref().unwrap_or(&self.name);
                let brand = changes.brand.as_deref().unwrap_or(&self.brand);
                name != self.name || brand != self.brand
            }
        }
    }

    /// Merge `changes` into a copy of this device.
    ///
    /// `id` and `created_at` are carried over unchanged.
    pub fn apply_changes(
        &self,
        changes: &DeviceChanges,
        mode: UpdateMode,
    ) -> Result<Device, LockRule> {
        if self.is_in_use() && self.touches_locked_fields(changes, mode) {
            return Err(LockRule::FieldLock);
        }

        let mut updated = self.clone();
        if let Some(name) = &changes.name {
            updated.name = name.clone();
        }
        if let Some(brand) = &changes.brand {
            updated.brand = brand.clone();
        }
        if let Some(state) = changes.state {
            updated.state = state;
        }
        Ok(updated)
    }

    /// Check the delete guard
    pub fn check_deletable(&self) -> Result<(), LockRule> {
        if self.is_in_use() {
            return Err(LockRule::DeleteLock);
        }
        Ok(())
    }
}

impl From<&Device> for DeviceResponse {
    fn from(device: &Device) -> Self {
        DeviceResponse {
            id: device.id,
            name: device.name.clone(),
            brand: device.brand.clone(),
            state: device.state.as_str().to_string(),
            created_at: device.created_at,
        }
    }
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        DeviceResponse::from(&device)
    }
}

/// Check a `name`/`brand` value is non-blank and within the length limit
pub fn validate_label(field: &str, value: &str) -> Result<(), DeviceError> {
    if value.trim().is_empty() {
        return Err(DeviceError::Validation(format!("{} must not be empty", field)));
    }
    let len = value.chars().count();
    if len > MAX_LABEL_LEN {
        return Err(DeviceError::Validation(format!(
            "{} must be at most {} characters, got {}",
            field, MAX_LABEL_LEN, len
        )));
    }
    Ok(())
}
