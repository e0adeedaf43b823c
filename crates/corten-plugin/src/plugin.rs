//! Plugin trait and capability model
//!
//! A plugin implements any subset of the capability traits and advertises
//! each one through the matching accessor. Consumers query capabilities by
//! probing the accessors, never by downcasting the instance.

use crate::config::{ConfigProvider, ExtensionConfigProvider};
use crate::routing::RouteProvider;
use corten_bundle::BundleProvider;
use smallvec::SmallVec;
use std::sync::Arc;

/// Extension-point object registered by an installed package
pub trait Plugin {
    fn as_bundle_provider(&self) -> Option<&dyn BundleProvider> {
        None
    }

    fn as_config_provider(&self) -> Option<&dyn ConfigProvider> {
        None
    }

    fn as_route_provider(&self) -> Option<&dyn RouteProvider> {
        None
    }

    fn as_extension_provider(&self) -> Option<&dyn ExtensionConfigProvider> {
        None
    }

    fn as_dependency_provider(&self) -> Option<&dyn DependencyProvider> {
        None
    }
}

/// Capability of plugins that require other packages to be installed
pub trait DependencyProvider {
    fn package_dependencies(&self) -> Vec<Arc<str>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Bundles,
    Config,
    Routing,
    ExtensionConfig,
    Dependencies,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Bundles,
        Capability::Config,
        Capability::Routing,
        Capability::ExtensionConfig,
        Capability::Dependencies,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Capability::Bundles => "Bundles",
            Capability::Config => "Config",
            Capability::Routing => "Routing",
            Capability::ExtensionConfig => "Extension",
            Capability::Dependencies => "Dependent",
        }
    }
}

/// Probes the capability accessors of a plugin
pub fn capabilities_of(plugin: &dyn Plugin) -> SmallVec<[Capability; 5]> {
    let mut capabilities = SmallVec::new();

    if plugin.as_bundle_provider().is_some() {
        capabilities.push(Capability::Bundles);
    }

    if plugin.as_config_provider().is_some() {
        capabilities.push(Capability::Config);
    }

    if plugin.as_route_provider().is_some() {
        capabilities.push(Capability::Routing);
    }

    if plugin.as_extension_provider().is_some() {
        capabilities.push(Capability::ExtensionConfig);
    }

    if plugin.as_dependency_provider().is_some() {
        capabilities.push(Capability::Dependencies);
    }

    capabilities
}
