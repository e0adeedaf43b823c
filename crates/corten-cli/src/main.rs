use clap::{Parser, Subcommand};
use colored::Colorize;
use corten_cli::commands::{
    cache::{self, CacheAction},
    config::{self, ConfigAction},
    debug::{self, DebugAction},
    dotenv::{self, DotenvAction},
    jwt::{self, JwtAction},
    maintenance::{self, OutputFormat},
    web_dir,
};
use corten_cli::common::GlobalOpts;
use corten_cli::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "corten")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Corten manager layer",
    long_about = "Management commands for a Corten installation: web entry points, maintenance mode, dotenv and manager configuration, debug cookies and plugin diagnostics."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the web entry points into the public directory
    InstallWebDir {
        /// Installation to install into (default: the project directory)
        target: Option<PathBuf>,
        /// Do not install the development entry points
        #[arg(long)]
        no_dev: bool,
    },
    /// Enable or disable maintenance mode, or show its status
    Maintenance {
        /// enable/on or disable/off; omit to show the current status
        state: Option<String>,
        /// Custom maintenance page template
        #[arg(long)]
        template: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "txt")]
        format: OutputFormat,
    },
    /// Read or edit the project dotenv files
    Dotenv {
        #[command(subcommand)]
        action: DotenvAction,
    },
    /// Read or edit the manager configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Issue or inspect debug cookies
    JwtCookie {
        #[command(subcommand)]
        action: JwtAction,
    },
    /// Inspect plugins and the resolved bundle order
    Debug {
        #[command(subcommand)]
        action: DebugAction,
    },
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Print the version
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbosity_level());

    let result = match cli.command {
        Commands::InstallWebDir { target, no_dev } => {
            web_dir::handle(target, no_dev, &cli.global)
        }
        Commands::Maintenance { state, template, format } => {
            maintenance::handle(state, template, format, &cli.global)
        }
        Commands::Dotenv { action } => dotenv::handle(action, &cli.global),
        Commands::Config { action } => config::handle(action, &cli.global),
        Commands::JwtCookie { action } => jwt::handle(action, &cli.global),
        Commands::Debug { action } => debug::handle(action, &cli.global),
        Commands::Cache { action } => cache::handle(action, &cli.global),
        Commands::Version => {
            println!("corten {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(error) = result {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
