//! Error types for plugin discovery and instantiation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Package manifest \"{}\" cannot be read: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Package \"{package}\" declares an unknown plugin class \"{class_ref}\"")]
    InvalidPlugin { package: String, class_ref: String },

    /// A capability implementation rejected its configuration input
    #[error("{0}")]
    Configuration(String),
}
