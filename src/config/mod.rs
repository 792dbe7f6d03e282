//! Configuration module
//!
//! Table defaults, display labels and logging settings loaded from TOML.

#[allow(clippy::module_inception)]
pub mod config;
