//! Bundle resolution
//!
//! Collects declarations from every bundle-contributing plugin, merges them
//! by name, orders them by their load-after relations and filters the result
//! for the active environment. Outside of development the computed order is
//! persisted to a cache artifact that short-circuits every later boot until
//! an external cache clear deletes it; the cache carries no fingerprint of
//! the plugin set by design.

use crate::declaration::BundleDeclaration;
use crate::errors::BundleError;
use crate::parser::{DeclarationParser, DelegatingParser};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A plugin-side source of bundle declarations
///
/// The resolver hands its parser to the provider so legacy providers can
/// resolve on-disk module declarations through it.
pub trait BundleProvider {
    fn bundles(&self, parser: &dyn DeclarationParser) -> Result<Vec<BundleDeclaration>, BundleError>;
}

/// Computes the ordered bundle set for one kernel boot
pub struct BundleResolver {
    parser: DelegatingParser,
    order_passes: Option<usize>,
}

impl BundleResolver {
    pub fn new(parser: DelegatingParser) -> Self {
        BundleResolver { parser, order_passes: None }
    }

    /// Overrides the ordering pass cap; the default is derived from the
    /// declaration count
    pub fn with_order_passes(mut self, passes: usize) -> Self {
        self.order_passes = Some(passes);
        self
    }

    pub fn parser(&self) -> &DelegatingParser {
        &self.parser
    }

    /// Resolves the bundle set contributed by the given providers
    ///
    /// When a cache path is given and the artifact exists it is returned
    /// unconditionally without consulting the providers; a cache path with
    /// no artifact causes the freshly computed order to be written there.
    pub fn resolve(
        &self,
        providers: &[&dyn BundleProvider],
        is_dev: bool,
        cache_path: Option<&Path>,
    ) -> Result<Vec<BundleDeclaration>, BundleError> {
        if let Some(path) = cache_path {
            if path.exists() {
                return read_cache(path);
            }
        }

        let mut collected = Vec::new();

        for provider in providers {
            collected.extend(provider.bundles(&self.parser)?);
        }

        debug!(count = collected.len(), "collected bundle declarations");

        let merged = merge_declarations(collected);
        let ordered = self.order_declarations(merged)?;
        let resolved: Vec<BundleDeclaration> =
            ordered.into_iter().filter(|declaration| declaration.loads_in(is_dev)).collect();

        if let Some(path) = cache_path {
            write_cache(path, &resolved)?;
        }

        Ok(resolved)
    }

    /// Applies position-nudge passes until the order settles
    ///
    /// A pass that still moves declarations once the cap is exhausted means
    /// the load-after relations cannot settle and resolution fails instead
    /// of looping.
    fn order_declarations(
        &self,
        mut declarations: Vec<BundleDeclaration>,
    ) -> Result<Vec<BundleDeclaration>, BundleError> {
        let cap = self.order_passes.unwrap_or_else(|| default_order_passes(declarations.len()));
        let mut passes = 0;
        let mut previous: Vec<Arc<str>> = Vec::new();

        loop {
            let moved = nudge_pass(&mut declarations);

            if moved.is_empty() {
                return Ok(declarations);
            }

            passes += 1;

            if passes > cap {
                // a declaration that settles can still move once in the
                // final sweep; only repeat movers are part of the knot
                let mut names: Vec<String> = moved
                    .iter()
                    .filter(|name| previous.contains(name))
                    .map(ToString::to_string)
                    .collect();

                if names.is_empty() {
                    names = moved.iter().map(ToString::to_string).collect();
                }

                return Err(BundleError::CyclicLoadOrder { passes: cap, names });
            }

            previous = moved;
        }
    }
}

fn default_order_passes(declarations: usize) -> usize {
    (declarations * 2).max(10)
}

/// Merges a raw declaration sequence into a name-unique sequence
///
/// A declaration whose name matches an existing entry, or whose replaces set
/// contains an existing entry's name, overrides that entry in place with a
/// full attribute replacement; everything else is appended. First-seen
/// position wins, last-seen attributes win. A declaration can match several
/// existing entries at once (its own name plus replaced names); it takes the
/// first matching slot and every other match is dropped, so no name appears
/// twice.
fn merge_declarations(declarations: Vec<BundleDeclaration>) -> Vec<BundleDeclaration> {
    let mut merged: Vec<BundleDeclaration> = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let matches = |existing: &BundleDeclaration| {
            existing.name == declaration.name || declaration.replaces.contains(&existing.name)
        };

        let Some(index) = merged.iter().position(|existing| matches(existing)) else {
            merged.push(declaration);
            continue;
        };

        let mut cursor = index + 1;
        while cursor < merged.len() {
            if matches(&merged[cursor]) {
                merged.remove(cursor);
            } else {
                cursor += 1;
            }
        }

        merged[index] = declaration;
    }

    merged
}

/// One position-nudge sweep; returns the names that were moved
///
/// Every declaration present at the start of the sweep is visited once. A
/// declaration positioned before one of its load-after targets is moved to
/// immediately after the last such target.
fn nudge_pass(declarations: &mut Vec<BundleDeclaration>) -> Vec<Arc<str>> {
    let snapshot: Vec<Arc<str>> = declarations.iter().map(|d| d.name.clone()).collect();
    let mut moved = Vec::new();

    for name in snapshot {
        let Some(current) = declarations.iter().position(|d| d.name == name) else {
            continue;
        };

        let target = declarations[current]
            .load_after
            .iter()
            .filter_map(|after| declarations.iter().position(|d| &d.name == after))
            .filter(|&position| position > current)
            .max();

        if let Some(last) = target {
            let declaration = declarations.remove(current);
            // after the removal the last target sits at `last - 1`, so
            // inserting at `last` places the declaration right behind it
            declarations.insert(last, declaration);
            moved.push(name);
        }
    }

    moved
}

fn read_cache(path: &Path) -> Result<Vec<BundleDeclaration>, BundleError> {
    debug!(path = %path.display(), "loading bundle order from cache");

    let raw = std::fs::read_to_string(path)?;

    serde_json::from_str(&raw)
        .map_err(|source| BundleError::CacheUnreadable { path: path.to_path_buf(), source })
}

fn write_cache(path: &Path, declarations: &[BundleDeclaration]) -> Result<(), BundleError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let raw = serde_json::to_string(declarations)
        .map_err(|source| BundleError::CacheUnreadable { path: path.to_path_buf(), source })?;

    std::fs::write(path, raw)?;

    info!(path = %path.display(), count = declarations.len(), "bundle order cached");

    Ok(())
}
