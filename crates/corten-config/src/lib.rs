//! Corten Configuration Files
//!
//! This crate handles the two small configuration surfaces of the manager
//! layer: the persisted manager configuration (a YAML document controlling
//! disabled packages and integration toggles) and the project dotenv files.

pub mod dotenv;
pub mod errors;
pub mod manager_config;

pub use dotenv::{merged_values, DotEnvFile};
pub use errors::ConfigError;
pub use manager_config::{ManagerConfig, CONFIG_FILE};
