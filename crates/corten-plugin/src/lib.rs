//! Corten Plugin Discovery
//!
//! This crate handles plugin discovery and instantiation for the Corten
//! manager layer. It reads the installed-package manifest, turns declared
//! plugin class references into instances through an explicit constructor
//! registry, and caches one instance per package for the process lifetime.
//!
//! Plugins advertise what they contribute through capability accessors on
//! the [`Plugin`] trait; consumers filter the instance cache by capability
//! instead of inspecting concrete types.

pub mod config;
pub mod errors;
pub mod factory;
pub mod loader;
pub mod manifest;
pub mod plugin;
pub mod routing;

pub use config::{ConfigFragment, ConfigProvider, ContainerConfigLoader, ContainerContext, ExtensionConfigProvider};
pub use errors::PluginError;
pub use factory::PluginFactory;
pub use loader::{PluginLoader, RegisteredPlugin};
pub use manifest::{list_plugins, DiscoveredPlugin, PackageDescriptor, PLUGIN_EXTRA_KEY};
pub use plugin::{capabilities_of, Capability, DependencyProvider, Plugin};
pub use routing::{RouteDefinition, RouteProvider};
