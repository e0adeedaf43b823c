//! Signed debug-cookie token manager
//!
//! Issues and verifies the compact signed tokens that gate the debug and
//! preview mode. The signing secret lives under the project var directory
//! and is created on first use; tokens carry issued-at and expiry claims
//! and are never renewed by this component.

use crate::errors::TokenError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde_json::{Map, Value};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the debug token
pub const COOKIE_NAME: &str = "corten_debug";

/// Token lifetime in seconds
pub const TOKEN_TTL: i64 = 86_400;

const SECRET_FILE: &str = "jwt_secret";
const JWT_HEADER: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

/// Claims carried by a token
pub type TokenPayload = Map<String, Value>;

/// A debug cookie ready to be rendered into a Set-Cookie header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCookie {
    value: String,
    clearing: bool,
}

impl DebugCookie {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the Set-Cookie header value
    ///
    /// The cookie is `HttpOnly` and scoped to the site root; transport
    /// attributes are left to the HTTP layer.
    pub fn to_set_cookie_header(&self) -> String {
        if self.clearing {
            format!("{COOKIE_NAME}=; Path=/; Max-Age=0; HttpOnly")
        } else {
            format!("{COOKIE_NAME}={}; Path=/; HttpOnly", self.value)
        }
    }
}

/// Manages the signing secret and the token lifecycle
pub struct TokenManager {
    secret_path: PathBuf,
    secret: Vec<u8>,
}

impl TokenManager {
    /// Reads the signing secret, creating it on first use
    pub fn new(project_dir: impl AsRef<Path>) -> Result<Self, TokenError> {
        let secret_path = project_dir.as_ref().join("var").join(SECRET_FILE);
        let secret = ensure_secret(&secret_path)?;

        Ok(TokenManager { secret_path, secret })
    }

    /// Issues a signed token over the payload plus freshly stamped claims
    pub fn issue(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.issue_at(payload, Utc::now().timestamp())
    }

    /// Verifies structure, signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Issues the payload as a debug cookie
    pub fn cookie(&self, payload: &TokenPayload) -> Result<DebugCookie, TokenError> {
        Ok(DebugCookie { value: self.issue(payload)?, clearing: false })
    }

    /// Cookie that instructs the client to drop the token
    pub fn clearing_cookie() -> DebugCookie {
        DebugCookie { value: String::new(), clearing: true }
    }

    fn issue_at(&self, payload: &TokenPayload, issued_at: i64) -> Result<String, TokenError> {
        let mut claims = payload.clone();
        claims.insert("iat".to_string(), Value::from(issued_at));
        claims.insert("exp".to_string(), Value::from(issued_at + TOKEN_TTL));

        let body =
            serde_json::to_string(&claims).map_err(|_source| TokenError::InvalidToken)?;

        let mut token = String::new();
        token.push_str(&URL_SAFE_NO_PAD.encode(JWT_HEADER));
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(&body));

        let signature = self.sign(token.as_bytes())?;
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(signature));

        Ok(token)
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<TokenPayload, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(body), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            debug!("token is not three dot-separated segments");
            return Err(TokenError::InvalidToken);
        };

        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
            debug!("token signature segment is not base64url");
            return Err(TokenError::InvalidToken);
        };

        let message = format!("{header}.{body}");
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return Err(TokenError::InvalidToken);
        };
        mac.update(message.as_bytes());

        if mac.verify_slice(&signature).is_err() {
            debug!("token signature mismatch");
            return Err(TokenError::InvalidToken);
        }

        let Ok(raw) = URL_SAFE_NO_PAD.decode(body) else {
            debug!("token payload segment is not base64url");
            return Err(TokenError::InvalidToken);
        };

        let Ok(claims) = serde_json::from_slice::<TokenPayload>(&raw) else {
            debug!("token payload is not a JSON object");
            return Err(TokenError::InvalidToken);
        };

        match claims.get("exp").and_then(Value::as_i64) {
            Some(expires) if expires >= now => Ok(claims),
            _ => {
                debug!("token expired or carries no expiry");
                Err(TokenError::InvalidToken)
            }
        }
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|source| {
            TokenError::SecretUnavailable {
                path: self.secret_path.clone(),
                source: Box::new(source),
            }
        })?;
        mac.update(message);

        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").field("secret_path", &self.secret_path).finish()
    }
}

fn ensure_secret(path: &Path) -> Result<Vec<u8>, TokenError> {
    let unavailable = |source: std::io::Error| TokenError::SecretUnavailable {
        path: path.to_path_buf(),
        source: Box::new(source),
    };

    if path.exists() {
        return std::fs::read(path).map_err(unavailable);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(unavailable)?;
    }

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = hex_encode(&bytes);

    std::fs::write(path, &secret).map_err(unavailable)?;
    debug!(path = %path.display(), "token secret created");

    Ok(secret.into_bytes())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
