//! Container-configuration capabilities
//!
//! Config plugins push named configuration fragments into a
//! [`ContainerConfigLoader`] during kernel boot; extension plugins patch the
//! fragment list of a named container extension through an append-only fold
//! over a [`ContainerContext`].

use crate::errors::PluginError;
use ahash::AHashMap;
use serde_json::Value;
use std::path::Path;

/// One configuration fragment as passed through the container layer
pub type ConfigFragment = Value;

/// Sink for container configuration sources
///
/// The kernel supplies the implementation; plugins only push into it.
pub trait ContainerConfigLoader {
    fn load_file(&mut self, path: &Path) -> Result<(), PluginError>;

    fn load_str(&mut self, origin: &str, content: &str) -> Result<(), PluginError>;
}

/// Capability of plugins that contribute container configuration
pub trait ConfigProvider {
    fn register_container_config(
        &self,
        loader: &mut dyn ContainerConfigLoader,
        manager_config: &ConfigFragment,
    ) -> Result<(), PluginError>;
}

/// Capability of plugins that patch a named extension's fragment list
///
/// The fold is append-only: implementations may push new fragments and read
/// the context, but must not rewrite fragments appended by earlier plugins.
pub trait ExtensionConfigProvider {
    fn extension_config(
        &self,
        extension: &str,
        fragments: Vec<ConfigFragment>,
        context: &mut ContainerContext,
    ) -> Result<Vec<ConfigFragment>, PluginError>;
}

/// Container parameters and environment values visible to extension patches
///
/// The process environment is snapshotted in by the caller rather than read
/// ambiently, so tests can inject it. Defaults recorded through
/// [`ContainerContext::set_env_default`] never shadow a real environment
/// value.
#[derive(Debug, Clone, Default)]
pub struct ContainerContext {
    parameters: AHashMap<String, Value>,
    env: AHashMap<String, String>,
    env_defaults: AHashMap<String, String>,
}

impl ContainerContext {
    pub fn new() -> Self {
        ContainerContext::default()
    }

    pub fn with_parameters(mut self, parameters: AHashMap<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_env(mut self, env: AHashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Returns a parameter rendered as a string, for scalar parameters
    pub fn string_parameter(&self, key: &str) -> Option<String> {
        match self.parameters.get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            Some(Value::Number(value)) => Some(value.to_string()),
            Some(Value::Bool(value)) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn set_parameter(&mut self, key: impl Into<String>, value: Value) {
        self.parameters.insert(key.into(), value);
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Records a default for an environment variable
    ///
    /// The default is dropped when the process environment already carries
    /// the variable.
    pub fn set_env_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();

        if self.env.contains_key(&key) {
            return;
        }

        self.env_defaults.insert(key, value.into());
    }

    pub fn env_default(&self, key: &str) -> Option<&str> {
        self.env_defaults.get(key).map(String::as_str)
    }

    /// Environment value with fallback to a recorded default
    pub fn env_or_default(&self, key: &str) -> Option<&str> {
        self.env(key).or_else(|| self.env_default(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_parameter_renders_scalars() {
        let parameters: AHashMap<String, Value> = [
            ("host".to_string(), json!("localhost")),
            ("port".to_string(), json!(3306)),
            ("nested".to_string(), json!({"a": 1})),
        ]
        .into_iter()
        .collect();

        let context = ContainerContext::new().with_parameters(parameters);
        assert_eq!(context.string_parameter("host").as_deref(), Some("localhost"));
        assert_eq!(context.string_parameter("port").as_deref(), Some("3306"));
        assert_eq!(context.string_parameter("nested"), None);
        assert_eq!(context.string_parameter("missing"), None);
    }

    #[test]
    fn test_env_default_never_shadows_process_env() {
        let env: AHashMap<String, String> =
            [("MAILER_DSN".to_string(), "smtp://real".to_string())].into_iter().collect();

        let mut context = ContainerContext::new().with_env(env);
        context.set_env_default("MAILER_DSN", "sendmail://default");
        context.set_env_default("DATABASE_URL", "mysql://localhost");

        assert_eq!(context.env_default("MAILER_DSN"), None);
        assert_eq!(context.env_or_default("MAILER_DSN"), Some("smtp://real"));
        assert_eq!(context.env_or_default("DATABASE_URL"), Some("mysql://localhost"));
    }
}
