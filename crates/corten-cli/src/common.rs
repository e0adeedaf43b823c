//! Options shared by every command

use anyhow::{anyhow, Result};
use clap::Parser;
use corten_kernel::Environment;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project directory the command operates on"
    )]
    pub project_dir: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = "prod",
        help = "Environment to act on (prod or dev)"
    )]
    pub env: String,

    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for info, -vv for debug)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Effective verbosity level; quiet wins over any -v count
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// The environment named by `--env`
    pub fn environment(&self) -> Result<Environment> {
        Environment::from_name(&self.env).ok_or_else(|| {
            anyhow!("unknown environment \"{}\" (expected \"prod\" or \"dev\")", self.env)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(env: &str, quiet: bool, verbose: u8) -> GlobalOpts {
        GlobalOpts { project_dir: PathBuf::from("."), env: env.to_string(), quiet, verbose }
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(opts("prod", true, 2).verbosity_level(), 0);
        assert_eq!(opts("prod", false, 2).verbosity_level(), 2);
    }

    #[test]
    fn test_environment_parses_the_known_names() {
        assert!(opts("prod", false, 0)
            .environment()
            .is_ok_and(|env| env == Environment::Production));
        assert!(opts("dev", false, 0)
            .environment()
            .is_ok_and(|env| env == Environment::Development));
        assert!(opts("staging", false, 0).environment().is_err());
    }
}
