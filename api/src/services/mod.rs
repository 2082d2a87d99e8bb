//! Domain services

pub mod device_service;
