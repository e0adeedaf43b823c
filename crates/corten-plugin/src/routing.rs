//! Route contribution capability

use crate::errors::PluginError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One named route as contributed by a plugin or the project route file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub name: Arc<str>,
    pub path: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<Arc<str>>,
}

impl RouteDefinition {
    pub fn new(name: impl Into<Arc<str>>, path: impl Into<Arc<str>>) -> Self {
        RouteDefinition { name: name.into(), path: path.into(), controller: None }
    }

    #[must_use]
    pub fn with_controller(mut self, controller: impl Into<Arc<str>>) -> Self {
        self.controller = Some(controller.into());
        self
    }
}

/// Capability of plugins that contribute routes
///
/// Only consulted when the kernel runs in development mode.
pub trait RouteProvider {
    fn routes(&self) -> Result<Vec<RouteDefinition>, PluginError>;
}
