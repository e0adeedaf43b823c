//! Web entry point installation
//!
//! Installs the static entry points into the public directory of a target
//! installation. `index.html` is always brought up to date, `robots.txt`
//! belongs to the user once it exists, and the preview entry point is only
//! installed for installations that keep development access.

use crate::common::GlobalOpts;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

const INDEX_HTML: &str = include_str!("../skeleton/web/index.html");
const ROBOTS_TXT: &str = include_str!("../skeleton/web/robots.txt");
const PREVIEW_HTML: &str = include_str!("../skeleton/web/preview.html");

/// Entry points of earlier versions that are removed when present
const LEGACY_FILES: [&str; 1] = ["install.html"];

pub fn handle(target: Option<PathBuf>, no_dev: bool, opts: &GlobalOpts) -> Result<()> {
    let target = target.unwrap_or_else(|| opts.project_dir.clone());
    let web_dir = target.join("public");

    std::fs::create_dir_all(&web_dir)
        .with_context(|| format!("cannot create \"{}\"", web_dir.display()))?;

    std::fs::write(web_dir.join("index.html"), INDEX_HTML)?;
    println!("{} index.html", "installed".green());

    let robots = web_dir.join("robots.txt");

    if robots.exists() {
        debug!("robots.txt exists, keeping the user copy");
    } else {
        std::fs::write(&robots, ROBOTS_TXT)?;
        println!("{} robots.txt", "installed".green());
    }

    let preview = web_dir.join("preview.html");

    if no_dev {
        if preview.exists() {
            std::fs::remove_file(&preview)?;
            println!("{} preview.html", "removed".yellow());
        }
    } else {
        std::fs::write(&preview, PREVIEW_HTML)?;
        println!("{} preview.html", "installed".green());
    }

    for name in LEGACY_FILES {
        let legacy = web_dir.join(name);

        if legacy.exists() {
            std::fs::remove_file(&legacy)?;
            println!("{} {name}", "removed".yellow());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(dir: &tempfile::TempDir) -> GlobalOpts {
        GlobalOpts {
            project_dir: dir.path().to_path_buf(),
            env: "prod".to_string(),
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_installs_the_entry_point_matrix() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };

        assert!(handle(None, false, &opts(&dir)).is_ok());

        let web_dir = dir.path().join("public");
        assert!(web_dir.join("index.html").is_file());
        assert!(web_dir.join("robots.txt").is_file());
        assert!(web_dir.join("preview.html").is_file());
    }

    #[test]
    fn test_robots_file_is_user_owned_once_present() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let web_dir = dir.path().join("public");
        assert!(std::fs::create_dir_all(&web_dir).is_ok());
        assert!(std::fs::write(web_dir.join("robots.txt"), "User-agent: *\nDisallow: /\n").is_ok());

        assert!(handle(None, false, &opts(&dir)).is_ok());

        let content = std::fs::read_to_string(web_dir.join("robots.txt"));
        assert!(content.is_ok_and(|robots| robots.contains("Disallow: /")));
    }

    #[test]
    fn test_no_dev_removes_the_preview_entry_point() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };

        assert!(handle(None, false, &opts(&dir)).is_ok());
        assert!(dir.path().join("public").join("preview.html").is_file());

        assert!(handle(None, true, &opts(&dir)).is_ok());
        assert!(!dir.path().join("public").join("preview.html").exists());
    }

    #[test]
    fn test_legacy_install_entry_point_is_removed() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let web_dir = dir.path().join("public");
        assert!(std::fs::create_dir_all(&web_dir).is_ok());
        assert!(std::fs::write(web_dir.join("install.html"), "legacy").is_ok());

        assert!(handle(None, false, &opts(&dir)).is_ok());
        assert!(!web_dir.join("install.html").exists());
    }

    #[test]
    fn test_explicit_target_overrides_the_project_dir() {
        let Ok(project) = tempfile::TempDir::new() else {
            return;
        };
        let Ok(target) = tempfile::TempDir::new() else {
            return;
        };

        assert!(handle(Some(target.path().to_path_buf()), false, &opts(&project)).is_ok());
        assert!(target.path().join("public").join("index.html").is_file());
        assert!(!project.path().join("public").exists());
    }
}
