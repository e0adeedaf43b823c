//! Dotenv file editing
//!
//! Reads and rewrites the project `.env` file as an ordered key-value list.
//! Rewriting renders every pair in single-quoted `KEY='value'` form, one per
//! line; comments present in a hand-edited file do not survive a rewrite.

use crate::errors::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One parsed dotenv file, order preserved
#[derive(Debug, Clone)]
pub struct DotEnvFile {
    path: PathBuf,
    pairs: Vec<(String, String)>,
}

impl DotEnvFile {
    /// Load a dotenv file; a missing file is an empty list
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();

        if !path.exists() {
            return Ok(DotEnvFile { path, pairs: Vec::new() });
        }

        let content = std::fs::read_to_string(&path)?;
        let pairs = content.lines().filter_map(parse_line).collect();

        Ok(DotEnvFile { path, pairs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Last assignment wins, as in shell sourcing
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Updates an existing key in place or appends a new pair
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.pairs.iter_mut().find(|(name, _)| *name == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Removes all assignments of a key; returns whether anything was removed
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(name, _)| name != key);

        before != self.pairs.len()
    }

    /// Rewrites the file, deleting it when no pairs remain
    pub fn save(&self) -> Result<(), ConfigError> {
        if self.pairs.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
                debug!(path = %self.path.display(), "dotenv file removed");
            }

            return Ok(());
        }

        let mut content = String::new();

        for (key, value) in &self.pairs {
            content.push_str(&format!("{key}='{}'\n", value.replace('\'', "\\'")));
        }

        std::fs::write(&self.path, content)?;

        Ok(())
    }
}

/// Merged values of `.env` and `.env.local`, later file winning per key
///
/// Returns `None` when the project has no `.env` file at all; `.env.local`
/// alone is not consulted.
pub fn merged_values(project_dir: &Path) -> Result<Option<Vec<(String, String)>>, ConfigError> {
    let env_path = project_dir.join(".env");

    if !env_path.exists() {
        return Ok(None);
    }

    let mut merged = DotEnvFile::load(&env_path)?.pairs.clone();
    let local = DotEnvFile::load(project_dir.join(".env.local"))?;

    for (key, value) in local.pairs {
        match merged.iter_mut().find(|(name, _)| *name == key) {
            Some(pair) => pair.1 = value,
            None => merged.push((key, value)),
        }
    }

    Ok(Some(merged))
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(value.trim())))
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 {
        if value.starts_with('\'') && value.ends_with('\'') {
            return value[1..value.len() - 1].replace("\\'", "'");
        }

        if value.starts_with('"') && value.ends_with('"') {
            return value[1..value.len() - 1].replace("\\\"", "\"");
        }
    }

    value.to_string()
}
