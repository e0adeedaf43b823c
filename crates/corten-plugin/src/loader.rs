//! Plugin instance cache
//!
//! Instantiates one object per discovered plugin, keyed by package name, in
//! manifest order. The instance set is built lazily on first access and
//! reused for the loader's lifetime; reinitialization means constructing a
//! fresh loader.

use crate::errors::PluginError;
use crate::factory::PluginFactory;
use crate::manifest::list_plugins;
use crate::plugin::{capabilities_of, Capability, Plugin};
use ahash::AHashSet;
use once_cell::unsync::OnceCell;
use smallvec::SmallVec;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// A constructed plugin together with its discovery identity
pub struct RegisteredPlugin {
    package: Arc<str>,
    class_ref: Arc<str>,
    instance: Box<dyn Plugin>,
    capabilities: SmallVec<[Capability; 5]>,
}

impl RegisteredPlugin {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_ref(&self) -> &str {
        &self.class_ref
    }

    pub fn instance(&self) -> &dyn Plugin {
        self.instance.as_ref()
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl std::fmt::Debug for RegisteredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPlugin")
            .field("package", &self.package)
            .field("class_ref", &self.class_ref)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

pub struct PluginLoader {
    manifest_path: PathBuf,
    disabled: AHashSet<String>,
    factory: PluginFactory,
    instances: OnceCell<Vec<RegisteredPlugin>>,
}

impl PluginLoader {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        disabled: AHashSet<String>,
        factory: PluginFactory,
    ) -> Self {
        PluginLoader {
            manifest_path: manifest_path.into(),
            disabled,
            factory,
            instances: OnceCell::new(),
        }
    }

    /// All plugin instances in discovery order, built once
    pub fn instances(&self) -> Result<&[RegisteredPlugin], PluginError> {
        self.instances.get_or_try_init(|| self.build()).map(Vec::as_slice)
    }

    /// Instances supporting the given capability, preserving discovery order
    pub fn instances_of(&self, capability: Capability) -> Result<Vec<&RegisteredPlugin>, PluginError> {
        Ok(self.instances()?.iter().filter(|plugin| plugin.supports(capability)).collect())
    }

    fn build(&self) -> Result<Vec<RegisteredPlugin>, PluginError> {
        let discovered = list_plugins(&self.manifest_path, &self.disabled)?;
        let mut instances = Vec::with_capacity(discovered.len());

        for plugin in discovered {
            let instance = self.factory.construct(&plugin.package, &plugin.class_ref)?;
            let capabilities = capabilities_of(instance.as_ref());

            debug!(
                package = %plugin.package,
                class_ref = %plugin.class_ref,
                ?capabilities,
                "plugin instantiated"
            );

            instances.push(RegisteredPlugin {
                package: plugin.package,
                class_ref: plugin.class_ref,
                instance,
                capabilities,
            });
        }

        Ok(instances)
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("manifest_path", &self.manifest_path)
            .field("disabled", &self.disabled)
            .field("initialized", &self.instances.get().is_some())
            .finish()
    }
}
