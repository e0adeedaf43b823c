use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while collecting and resolving bundle declarations
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("File \"{}\" cannot be decoded", path.display())]
    MalformedDeclaration { path: PathBuf },

    #[error("No parser supports the resource \"{0}\"")]
    UnsupportedResource(String),

    #[error("Bundle order did not settle after {passes} passes; check the load-after relations of {names:?} for cycles")]
    CyclicLoadOrder { passes: usize, names: Vec<String> },

    #[error("Bundle cache \"{}\" cannot be decoded: {source}", path.display())]
    CacheUnreadable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
