//! Installed-package manifest discovery
//!
//! Reads the package manager's installed manifest and yields the packages
//! that declare a plugin entry class. Manifest order is the upstream
//! dependency-resolved order and is preserved as-is, never re-sorted.

use crate::errors::PluginError;
use ahash::AHashSet;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Extra key a package uses to declare its plugin entry class
pub const PLUGIN_EXTRA_KEY: &str = "corten-plugin";

/// One package entry of the installed manifest
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    pub name: Arc<str>,
    #[serde(default)]
    pub extra: PackageExtra,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageExtra {
    #[serde(rename = "corten-plugin")]
    pub plugin_class: Option<Arc<str>>,
}

/// A package that declares a plugin and survived the disabled filter
#[derive(Debug, Clone)]
pub struct DiscoveredPlugin {
    pub package: Arc<str>,
    pub class_ref: Arc<str>,
}

/// Both manifest layouts written by the package manager over time
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledManifest {
    Keyed { packages: Vec<PackageDescriptor> },
    Bare(Vec<PackageDescriptor>),
}

/// Lists the plugins declared by the installed packages
///
/// Packages without a plugin class and packages named in the disabled set
/// are excluded. A missing or undecodable manifest is a fatal startup
/// condition.
pub fn list_plugins(
    manifest_path: &Path,
    disabled: &AHashSet<String>,
) -> Result<Vec<DiscoveredPlugin>, PluginError> {
    let raw = std::fs::read_to_string(manifest_path).map_err(|source| {
        PluginError::ManifestUnreadable {
            path: manifest_path.to_path_buf(),
            source: Box::new(source),
        }
    })?;

    let manifest: InstalledManifest =
        serde_json::from_str(&raw).map_err(|source| PluginError::ManifestUnreadable {
            path: manifest_path.to_path_buf(),
            source: Box::new(source),
        })?;

    let packages = match manifest {
        InstalledManifest::Keyed { packages } | InstalledManifest::Bare(packages) => packages,
    };

    let mut plugins = Vec::new();

    for package in packages {
        let Some(class_ref) = package.extra.plugin_class else {
            continue;
        };

        if disabled.contains(package.name.as_ref()) {
            debug!(package = %package.name, "plugin disabled by manager configuration");
            continue;
        }

        plugins.push(DiscoveredPlugin { package: package.name, class_ref });
    }

    debug!(count = plugins.len(), "discovered plugins from installed manifest");

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_manifest(content: &str) -> Option<(tempfile::TempDir, PathBuf)> {
        let Ok(dir) = tempfile::TempDir::new() else {
            return None;
        };
        let path = dir.path().join("installed.json");
        let Ok(()) = std::fs::write(&path, content) else {
            return None;
        };
        Some((dir, path))
    }

    #[test]
    fn test_keyed_manifest_preserves_order() {
        let Some((_dir, path)) = write_manifest(
            r#"{"packages": [
                {"name": "corten/core", "extra": {"corten-plugin": "corten::core"}},
                {"name": "acme/blog", "extra": {"corten-plugin": "acme::blog"}},
                {"name": "acme/theme"}
            ]}"#,
        ) else {
            return;
        };

        let result = list_plugins(&path, &AHashSet::new());
        assert!(result.is_ok_and(|plugins| {
            plugins.iter().map(|p| p.package.as_ref()).eq(["corten/core", "acme/blog"])
        }));
    }

    #[test]
    fn test_bare_manifest_layout_is_accepted() {
        let Some((_dir, path)) = write_manifest(
            r#"[{"name": "corten/core", "extra": {"corten-plugin": "corten::core"}}]"#,
        ) else {
            return;
        };

        let result = list_plugins(&path, &AHashSet::new());
        assert!(result.is_ok_and(|plugins| {
            plugins.len() == 1 && plugins[0].class_ref.as_ref() == "corten::core"
        }));
    }

    #[test]
    fn test_disabled_packages_are_excluded() {
        let Some((_dir, path)) = write_manifest(
            r#"{"packages": [
                {"name": "corten/core", "extra": {"corten-plugin": "corten::core"}},
                {"name": "acme/blog", "extra": {"corten-plugin": "acme::blog"}}
            ]}"#,
        ) else {
            return;
        };

        let disabled: AHashSet<String> = ["acme/blog".to_string()].into_iter().collect();
        let result = list_plugins(&path, &disabled);
        assert!(result
            .is_ok_and(|plugins| plugins.iter().map(|p| p.package.as_ref()).eq(["corten/core"])));
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };

        let result = list_plugins(&dir.path().join("installed.json"), &AHashSet::new());
        assert!(result.is_err());
        let Err(err) = result else {
            return;
        };
        assert!(matches!(err, PluginError::ManifestUnreadable { .. }));
    }

    #[test]
    fn test_malformed_manifest_is_fatal() {
        let Some((_dir, path)) = write_manifest("{\"packages\": [oops") else {
            return;
        };

        let result = list_plugins(&path, &AHashSet::new());
        assert!(result.is_err());
        let Err(err) = result else {
            return;
        };
        assert!(matches!(err, PluginError::ManifestUnreadable { .. }));
    }
}
