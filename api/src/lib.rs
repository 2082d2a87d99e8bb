//! Devices API Library
//!
//! Device records with state-dependent mutation rules, served over HTTP.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
