//! Maintenance mode toggle
//!
//! Maintenance mode is on exactly when the rendered page exists at
//! `var/maintenance.html`; the HTTP layer serves that file with a 503 while
//! it is present. Enabling renders the embedded page template (or a custom
//! one) with the status code and language substituted.

use crate::common::GlobalOpts;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use std::path::{Path, PathBuf};

const PAGE_TEMPLATE: &str = include_str!("../skeleton/maintenance.html");
const STATUS_CODE: &str = "503";
const LANGUAGE: &str = "en";

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

pub fn handle(
    state: Option<String>,
    template: Option<PathBuf>,
    format: OutputFormat,
    opts: &GlobalOpts,
) -> Result<()> {
    let path = opts.project_dir.join("var").join("maintenance.html");

    match state.as_deref() {
        Some("enable" | "on") => {
            let page = match template {
                Some(template) => std::fs::read_to_string(&template).with_context(|| {
                    format!("cannot read template \"{}\"", template.display())
                })?,
                None => PAGE_TEMPLATE.to_string(),
            };

            let page =
                page.replace("{{status_code}}", STATUS_CODE).replace("{{language}}", LANGUAGE);

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&path, page)?;
            report(true, &path, format);
        }
        Some("disable" | "off") => {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }

            report(false, &path, format);
        }
        Some(other) => {
            bail!("unknown maintenance state \"{other}\" (expected \"enable\" or \"disable\")")
        }
        None => report(path.exists(), &path, format),
    }

    Ok(())
}

fn report(enabled: bool, path: &Path, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "enabled": enabled,
                "path": path.display().to_string(),
            });
            println!("{status}");
        }
        OutputFormat::Txt if enabled => {
            println!("Maintenance mode is {}", "enabled".yellow().bold());
        }
        OutputFormat::Txt => {
            println!("Maintenance mode is {}", "disabled".green().bold());
        }
    }
}
