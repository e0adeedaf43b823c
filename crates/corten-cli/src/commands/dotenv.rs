//! Dotenv inspection and editing
//!
//! Reads merge `.env` and `.env.local` with the local file winning per key;
//! writes only touch `.env`. A missing file or key is an empty success, not
//! an error.

use crate::common::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use corten_config::{merged_values, DotEnvFile};
use serde_json::{Map, Value};

#[derive(Subcommand, Debug, Clone)]
pub enum DotenvAction {
    /// Print one value, or all merged values as JSON
    Get { key: Option<String> },
    /// Set a key in .env
    Set { key: String, value: String },
    /// Remove a key from .env
    Remove { key: String },
}

pub fn handle(action: DotenvAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        DotenvAction::Get { key } => {
            let Some(pairs) = merged_values(&opts.project_dir)? else {
                return Ok(());
            };

            match key {
                Some(key) => {
                    if let Some((_, value)) = pairs.iter().find(|(name, _)| *name == key) {
                        println!("{value}");
                    }
                }
                None => {
                    let values: Map<String, Value> = pairs
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect();
                    println!("{}", Value::Object(values));
                }
            }
        }
        DotenvAction::Set { key, value } => {
            let mut file = DotEnvFile::load(opts.project_dir.join(".env"))?;
            file.set(&key, value);
            file.save()?;
            println!("{} {key}", "set".green());
        }
        DotenvAction::Remove { key } => {
            let mut file = DotEnvFile::load(opts.project_dir.join(".env"))?;

            if file.remove(&key) {
                file.save()?;
                println!("{} {key}", "removed".green());
            }
        }
    }

    Ok(())
}
