//! Bundle declaration model
//!
//! A declaration names one bundle and carries its merge and ordering
//! attributes. Declarations are collected from plugins, merged by name,
//! ordered by their load-after relations and filtered by environment before
//! the kernel registers anything.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

fn default_true() -> bool {
    true
}

/// One bundle to register with the kernel
///
/// The name is the primary key within a resolution pass. A later declaration
/// with the same name, or one that lists this name in `replaces`, overrides
/// this declaration in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleDeclaration {
    pub name: Arc<str>,

    /// Names of earlier declarations this one supersedes
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub replaces: SmallVec<[Arc<str>; 2]>,

    /// Names that must be registered before this bundle
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub load_after: SmallVec<[Arc<str>; 4]>,

    #[serde(default = "default_true")]
    pub load_in_production: bool,

    #[serde(default = "default_true")]
    pub load_in_development: bool,
}

impl BundleDeclaration {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        BundleDeclaration {
            name: name.into(),
            replaces: SmallVec::new(),
            load_after: SmallVec::new(),
            load_in_production: true,
            load_in_development: true,
        }
    }

    pub fn with_replaces<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.replaces = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_load_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.load_after = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_load_in_production(mut self, load: bool) -> Self {
        self.load_in_production = load;
        self
    }

    pub fn with_load_in_development(mut self, load: bool) -> Self {
        self.load_in_development = load;
        self
    }

    /// Whether this bundle is part of the materialized set for the
    /// given environment
    pub fn loads_in(&self, is_dev: bool) -> bool {
        if is_dev {
            self.load_in_development
        } else {
            self.load_in_production
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_flags_default_to_true() {
        let raw = r#"{"name": "acme/news-bundle"}"#;
        let result: Result<BundleDeclaration, _> = serde_json::from_str(raw);
        assert!(result.is_ok(), "minimal declaration should decode");
        assert!(result.is_ok_and(|d| d.load_in_production
            && d.load_in_development
            && d.replaces.is_empty()
            && d.load_after.is_empty()));
    }

    #[test]
    fn test_kebab_case_keys() {
        let raw = r#"
            {
                "name": "acme/comments-bundle",
                "replaces": ["legacy-comments"],
                "load-after": ["acme/news-bundle"],
                "load-in-production": false
            }
        "#;
        let result: Result<BundleDeclaration, _> = serde_json::from_str(raw);
        assert!(result.is_ok(), "kebab-case declaration should decode");
        assert!(result.is_ok_and(|d| {
            !d.load_in_production
                && d.load_in_development
                && d.replaces.iter().map(AsRef::as_ref).eq(["legacy-comments"])
                && d.load_after.iter().map(AsRef::as_ref).eq(["acme/news-bundle"])
        }));
    }

    #[test]
    fn test_loads_in() {
        let dev_only = BundleDeclaration::new("profiler").with_load_in_production(false);
        assert!(dev_only.loads_in(true));
        assert!(!dev_only.loads_in(false));

        let prod_only = BundleDeclaration::new("edge-cache").with_load_in_development(false);
        assert!(!prod_only.loads_in(true));
        assert!(prod_only.loads_in(false));
    }
}
