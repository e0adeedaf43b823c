//! Manager configuration access
//!
//! Reads and writes `config/manager.yaml`. Values are printed as JSON for
//! machine consumption; set values are parsed as YAML scalars, so booleans
//! and numbers keep their type.

use crate::common::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use corten_config::ManagerConfig;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print one value, or the full configuration as JSON
    Get { key: Option<String> },
    /// Set a configuration value
    Set { key: String, value: String },
}

pub fn handle(action: ConfigAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = ManagerConfig::load(&opts.project_dir)?;

            match key {
                Some(key) => {
                    if let Some(value) = config.get(&key) {
                        println!("{}", serde_json::to_value(value)?);
                    }
                }
                None => {
                    println!("{}", serde_json::to_string_pretty(&serde_json::to_value(
                        config.all()
                    )?)?);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = ManagerConfig::load(&opts.project_dir)?;

            let parsed = serde_yaml::from_str(&value)
                .unwrap_or(serde_yaml::Value::String(value.clone()));
            config.set(&key, parsed);
            config.save()?;

            println!("{} {key} = {value}", "set".green());
        }
    }

    Ok(())
}
