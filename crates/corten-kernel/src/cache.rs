//! Bundle cache maintenance

use std::io;
use std::path::Path;
use tracing::debug;

/// File below the environment cache directory holding the resolved order
pub const BUNDLE_CACHE_FILE: &str = "bundles.map";

/// Removes the resolved bundle order from the given cache directory
///
/// Returns whether a cache file was actually removed; a missing file is not
/// an error.
pub fn clear_bundle_cache(cache_dir: &Path) -> io::Result<bool> {
    let path = cache_dir.join(BUNDLE_CACHE_FILE);

    match std::fs::remove_file(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed bundle cache");
            Ok(true)
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}
