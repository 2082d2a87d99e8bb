//! Error types for the devices API

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::models::device::{Device, LockRule};

/// Main error type for the devices API
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(Uuid),

    #[error("Device {} is in use: {rule}", .device.id)]
    InUse { rule: LockRule, device: Box<Device> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

impl DeviceError {
    /// HTTP status the error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::NotFound(_) => StatusCode::NOT_FOUND,
            DeviceError::InUse { .. } => StatusCode::CONFLICT,
            DeviceError::Validation(_) => StatusCode::BAD_REQUEST,
            DeviceError::Storage(_)
            | DeviceError::IoError(_)
            | DeviceError::JsonError(_)
            | DeviceError::ConfigError(_)
            | DeviceError::ServerError(_)
            | DeviceError::ShutdownError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceError::NotFound(_) => "not_found",
            DeviceError::InUse { .. } => "device_in_use",
            DeviceError::Validation(_) => "validation_failed",
            DeviceError::Storage(_) | DeviceError::IoError(_) | DeviceError::JsonError(_) => {
                "storage_failure"
            }
            DeviceError::ConfigError(_)
            | DeviceError::ServerError(_)
            | DeviceError::ShutdownError(_) => "internal",
        }
    }
}

pub type DeviceResult<T> = Result<T, DeviceError>;
