//! Server state

use std::sync::Arc;

use crate::services::device_service::DeviceService;

/// Server state shared across handlers
pub struct ServerState {
    pub devices: Arc<DeviceService>,
}

impl ServerState {
    pub fn new(devices: Arc<DeviceService>) -> Self {
        Self { devices }
    }
}
