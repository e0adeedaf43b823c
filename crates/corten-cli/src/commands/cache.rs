//! Cache maintenance

use crate::common::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use corten_kernel::clear_bundle_cache;

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// Remove the bundle cache artifact for the active environment
    Clear,
}

pub fn handle(action: CacheAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        CacheAction::Clear => {
            let environment = opts.environment()?;
            let cache_dir = environment.cache_dir(&opts.project_dir);

            if clear_bundle_cache(&cache_dir)? {
                println!("{} bundle cache for {environment}", "cleared".green());
            } else {
                println!("no bundle cache for {environment}");
            }
        }
    }

    Ok(())
}
