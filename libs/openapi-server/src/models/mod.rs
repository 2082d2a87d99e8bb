//! Devices API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Version response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Device response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    /// One of `available`, `in_use`, `inactive`
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// Create device request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Update device request, shared by full (PUT) and partial (PATCH) updates.
///
/// A missing field and an explicit `null` both mean "not supplied".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable error kind (e.g. `not_found`, `device_in_use`)
    pub error: String,
    pub message: String,
    /// Business rule that rejected the request, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Current record when a business rule rejected the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceResponse>,
}
