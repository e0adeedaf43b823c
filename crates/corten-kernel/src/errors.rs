use corten_bundle::BundleError;
use corten_config::ConfigError;
use corten_plugin::PluginError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while booting the kernel integration layer
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Bundle resolution error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Route file \"{}\" cannot be decoded: {source}", path.display())]
    MalformedRoutes {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Parameter file \"{}\" cannot be decoded: {source}", path.display())]
    MalformedParameters {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
