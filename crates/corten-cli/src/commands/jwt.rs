//! Debug cookie generation and inspection
//!
//! Thin wrappers around the token manager; generation prints the Set-Cookie
//! header line and parsing prints the verified claims. A token that fails
//! verification is a handled failure with exit code 1.

use crate::common::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use corten_jwt::{TokenManager, TokenPayload};
use serde_json::Value;

#[derive(Subcommand, Debug, Clone)]
pub enum JwtAction {
    /// Issue a debug cookie and print its Set-Cookie header
    Generate {
        /// Enable debug mode in the token payload
        #[arg(long)]
        debug: bool,
    },
    /// Verify a token and print its claims as JSON
    Parse { content: String },
}

pub fn handle(action: JwtAction, opts: &GlobalOpts) -> Result<()> {
    let manager = TokenManager::new(&opts.project_dir)?;

    match action {
        JwtAction::Generate { debug } => {
            let mut payload = TokenPayload::new();
            payload.insert("debug".to_string(), Value::Bool(debug));

            let cookie = manager.cookie(&payload)?;
            println!("{}", cookie.to_set_cookie_header());
        }
        JwtAction::Parse { content } => {
            let claims = manager.verify(&content)?;
            println!("{}", serde_json::to_string_pretty(&Value::Object(claims))?);
        }
    }

    Ok(())
}
