//! Corten Debug Tokens
//!
//! This crate manages the signed, short-lived tokens that gate the Corten
//! debug and preview mode. It owns the persisted signing secret and the
//! compact token format carried by the debug cookie; callers on the HTTP
//! side decide what a failed verification means.

pub mod errors;
pub mod manager;

pub use errors::TokenError;
pub use manager::{DebugCookie, TokenManager, TokenPayload, COOKIE_NAME, TOKEN_TTL};
