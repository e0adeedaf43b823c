//! Legacy module declarations
//!
//! A legacy module is a first-level directory under the modules root. Its
//! presence alone declares a bundle. An optional sidecar file lists the
//! modules it must load after, comma separated; each referenced module is
//! parsed in turn so one parse call yields the whole requirement closure.
//! A `.skip` sentinel in the module directory suppresses the module.

use crate::declaration::BundleDeclaration;
use crate::errors::BundleError;
use crate::parser::DeclarationParser;
use ahash::AHashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Relation sidecar inside a module directory
const AUTOLOAD_FILE: &str = "autoload.ini";

/// Sentinel file that opts a module out of autoloading
const SKIP_FILE: &str = ".skip";

/// Parses legacy flat-directory module declarations
///
/// The modules directory is injected at construction time; there is no
/// process-wide autoload path.
pub struct IniParser {
    modules_dir: PathBuf,
}

impl IniParser {
    pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
        IniParser { modules_dir: modules_dir.into() }
    }

    fn parse_module(
        &self,
        module: &str,
        visited: &mut AHashSet<String>,
        declarations: &mut Vec<BundleDeclaration>,
    ) -> Result<(), BundleError> {
        if !visited.insert(module.to_string()) {
            return Ok(());
        }

        let dir = self.modules_dir.join(module);

        if dir.join(SKIP_FILE).exists() {
            debug!(module, "module opted out of autoloading");
            return Ok(());
        }

        let load_after = self.read_relations(&dir)?;

        declarations.push(BundleDeclaration::new(module).with_load_after(load_after.iter().cloned()));

        for required in &load_after {
            self.parse_module(required, visited, declarations)?;
        }

        Ok(())
    }

    /// Reads the comma-separated load-after list from the sidecar file
    ///
    /// A missing directory or sidecar yields empty relations. A leading `*`
    /// marks an optional requirement and is stripped; ordering treats both
    /// kinds the same way.
    fn read_relations(&self, dir: &Path) -> Result<Vec<String>, BundleError> {
        let path = dir.join("config").join(AUTOLOAD_FILE);

        if !path.is_file() {
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(&path)?;

        let Ok(raw) = String::from_utf8(bytes) else {
            return Err(BundleError::MalformedDeclaration { path });
        };

        Ok(raw
            .split(',')
            .map(|item| item.trim().trim_start_matches('*').trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl DeclarationParser for IniParser {
    fn supports(&self, resource: &str, hint: Option<&str>) -> bool {
        hint == Some("ini") || self.modules_dir.join(resource).is_dir()
    }

    fn parse(&self, resource: &str, _hint: Option<&str>) -> Result<Vec<BundleDeclaration>, BundleError> {
        let mut visited = AHashSet::new();
        let mut declarations = Vec::new();

        self.parse_module(resource, &mut visited, &mut declarations)?;

        Ok(declarations)
    }
}
