//! Corten Kernel Integration
//!
//! This crate wires the plugin and bundle layers into a bootable kernel:
//! it resolves the registered bundle order per environment, assembles
//! container configuration with the environment skeleton last, mounts the
//! development routes and folds extension configuration patches.
//!
//! The manager's own plugin lives here as well. It contributes the
//! framework bundle set, the legacy module declarations and the deployment
//! defaults for the database, mailer and orm extensions.

pub mod cache;
pub mod core_plugin;
pub mod dsn;
pub mod environment;
pub mod errors;
pub mod kernel;
pub mod routes;

pub use cache::{clear_bundle_cache, BUNDLE_CACHE_FILE};
pub use core_plugin::{CorePlugin, CORE_PACKAGE, CORE_PLUGIN_CLASS};
pub use environment::Environment;
pub use errors::KernelError;
pub use kernel::{
    default_factory, project_loader, ConfigSource, Kernel, RecordingConfigLoader,
    INSTALLED_MANIFEST,
};
pub use routes::{RouteCollection, LATE_ROUTES};
