//! Corten CLI library
//!
//! Exposes the command modules and shared options for the `corten` binary
//! and its integration tests.

pub mod commands;
pub mod common;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes tracing from the verbosity flags
///
/// `RUST_LOG` overrides the flag-derived filter when set.
pub fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
        .ok();
}
