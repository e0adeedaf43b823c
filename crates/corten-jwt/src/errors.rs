//! Error types for token handling

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token secret \"{}\" is unavailable: {source}", path.display())]
    SecretUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Structure, signature or expiry check failed
    ///
    /// Deliberately carries no detail; the token came from an untrusted
    /// client and callers treat this as a plain not-authenticated signal.
    #[error("Invalid token")]
    InvalidToken,
}
