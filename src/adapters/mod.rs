//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod output;
#[cfg(feature = "web")]
pub mod web;
