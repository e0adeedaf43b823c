//! Plugin factory
//!
//! Maps the class references declared in the installed manifest onto
//! registered constructors. A reference with no registered constructor is
//! an invalid plugin declaration.

use crate::errors::PluginError;
use crate::plugin::Plugin;
use ahash::AHashMap;

type Constructor = Box<dyn Fn() -> Box<dyn Plugin>>;

#[derive(Default)]
pub struct PluginFactory {
    constructors: AHashMap<String, Constructor>,
}

impl PluginFactory {
    pub fn new() -> Self {
        PluginFactory::default()
    }

    pub fn register<F>(&mut self, class_ref: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Plugin> + 'static,
    {
        self.constructors.insert(class_ref.into(), Box::new(constructor));
    }

    pub fn contains(&self, class_ref: &str) -> bool {
        self.constructors.contains_key(class_ref)
    }

    pub fn construct(&self, package: &str, class_ref: &str) -> Result<Box<dyn Plugin>, PluginError> {
        match self.constructors.get(class_ref) {
            Some(constructor) => Ok(constructor()),
            None => Err(PluginError::InvalidPlugin {
                package: package.to_string(),
                class_ref: class_ref.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory").field("registered", &self.constructors.len()).finish()
    }
}
