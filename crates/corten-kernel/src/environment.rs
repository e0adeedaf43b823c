//! Runtime environment selection
//!
//! The kernel runs in exactly one of two environments. Production registers
//! the cached bundle order and hides development tooling; development skips
//! the bundle cache and exposes the profiler routes.

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment the kernel boots in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Parses the conventional environment names
    ///
    /// Accepts both the short directory form and the spelled-out form.
    pub fn from_name(name: &str) -> Option<Environment> {
        match name {
            "prod" | "production" => Some(Environment::Production),
            "dev" | "development" => Some(Environment::Development),
            _ => None,
        }
    }

    /// Short name used in directory layouts and configuration file names
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "prod",
            Environment::Development => "dev",
        }
    }

    pub fn is_dev(self) -> bool {
        self == Environment::Development
    }

    /// Cache directory for this environment below the project directory
    pub fn cache_dir(self, project_dir: &Path) -> PathBuf {
        project_dir.join("var").join("cache").join(self.as_str())
    }

    /// Log directory below the project directory, shared by all environments
    pub fn log_dir(project_dir: &Path) -> PathBuf {
        project_dir.join("var").join("logs")
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_from_name_accepts_both_spellings() {
        assert_eq!(Environment::from_name("prod"), Some(Environment::Production));
        assert_eq!(Environment::from_name("production"), Some(Environment::Production));
        assert_eq!(Environment::from_name("dev"), Some(Environment::Development));
        assert_eq!(Environment::from_name("development"), Some(Environment::Development));
        assert_eq!(Environment::from_name("staging"), None);
    }

    #[test]
    fn test_directories_follow_the_var_layout() {
        let project_dir = Path::new("/srv/site");
        assert_eq!(
            Environment::Production.cache_dir(project_dir),
            Path::new("/srv/site/var/cache/prod")
        );
        assert_eq!(
            Environment::Development.cache_dir(project_dir),
            Path::new("/srv/site/var/cache/dev")
        );
        assert_eq!(Environment::log_dir(project_dir), Path::new("/srv/site/var/logs"));
    }
}
