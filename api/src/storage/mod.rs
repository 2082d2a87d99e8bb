//! Device record storage

pub mod json_file;
pub mod layout;
pub mod memory;
pub mod settings;
pub mod store;
