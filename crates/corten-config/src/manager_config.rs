//! Manager configuration
//!
//! A small persisted YAML document controlling disabled packages and other
//! integration toggles. All values live under the `manager` root key; a
//! missing file is an empty configuration, never an error.

use crate::errors::ConfigError;
use ahash::AHashSet;
use serde_yaml::{Mapping, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file path relative to the project directory
pub const CONFIG_FILE: &str = "config/manager.yaml";

const ROOT_KEY: &str = "manager";

#[derive(Debug, Clone, Default)]
pub struct ManagerConfig {
    path: PathBuf,
    values: Mapping,
}

impl ManagerConfig {
    /// Load the manager configuration of a project
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = project_dir.as_ref().join(CONFIG_FILE);

        if !path.exists() {
            debug!(path = %path.display(), "no manager configuration, starting empty");
            return Ok(ManagerConfig { path, values: Mapping::new() });
        }

        let content = std::fs::read_to_string(&path)?;
        let document: Value = serde_yaml::from_str(&content)?;

        let values = match document.get(ROOT_KEY) {
            Some(Value::Mapping(mapping)) => mapping.clone(),
            _ => Mapping::new(),
        };

        Ok(ManagerConfig { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &Mapping {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(Value::String(key.into()), value);
    }

    /// Package names suppressed during plugin discovery
    pub fn disabled_packages(&self) -> AHashSet<String> {
        let Some(Value::Sequence(entries)) = self.get("disabled_packages") else {
            return AHashSet::new();
        };

        entries
            .iter()
            .filter_map(|entry| entry.as_str())
            .map(str::to_string)
            .collect()
    }

    /// Save with atomic write
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut document = Mapping::new();
        document.insert(Value::String(ROOT_KEY.to_string()), Value::Mapping(self.values.clone()));
        let content = serde_yaml::to_string(&document)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("yaml.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }

        std::fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), "manager configuration saved");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_config() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };

        let result = ManagerConfig::load(dir.path());
        assert!(result.is_ok_and(|config| config.all().is_empty()));
    }

    #[test]
    fn test_values_live_under_the_root_key() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let Ok(()) = std::fs::create_dir_all(dir.path().join("config")) else {
            return;
        };
        let content = "manager:\n  disabled_packages:\n    - acme/blog\n    - acme/shop\n";
        let Ok(()) = std::fs::write(dir.path().join(CONFIG_FILE), content) else {
            return;
        };

        let Ok(config) = ManagerConfig::load(dir.path()) else {
            return;
        };
        let disabled = config.disabled_packages();
        assert_eq!(disabled.len(), 2);
        assert!(disabled.contains("acme/blog"));
        assert!(disabled.contains("acme/shop"));
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };

        let Ok(mut config) = ManagerConfig::load(dir.path()) else {
            return;
        };
        config.set("disabled_packages", Value::Sequence(vec![Value::String("acme/blog".into())]));
        assert!(config.save().is_ok());

        let reloaded = ManagerConfig::load(dir.path());
        assert!(reloaded.is_ok_and(|config| config.disabled_packages().contains("acme/blog")));
    }

    #[test]
    fn test_foreign_root_keys_are_ignored() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let Ok(()) = std::fs::create_dir_all(dir.path().join("config")) else {
            return;
        };
        let Ok(()) = std::fs::write(dir.path().join(CONFIG_FILE), "other:\n  key: 1\n") else {
            return;
        };

        let result = ManagerConfig::load(dir.path());
        assert!(result.is_ok_and(|config| config.all().is_empty()));
    }
}
