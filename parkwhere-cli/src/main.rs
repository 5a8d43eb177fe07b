//! ParkWhere CLI - Command-line interface
//!
//! This binary provides a command-line interface to the ParkWhere library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::bookmarks::BookmarkCommands;
use commands::config::ConfigCommands;
use commands::search::SearchArgs;
use commands::watch::WatchArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "parkwhere")]
#[command(version)]
#[command(about = "Find nearby car parks with live lot availability", long_about = None)]
struct Cli {
    /// Enable debug logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once for car parks around a point
    Search {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in meters (default: saved preference)
        #[arg(long)]
        radius: Option<f64>,

        /// Fetch live availability for the results
        #[arg(long)]
        live: bool,
    },

    /// Keep results live while reading location commands from stdin
    Watch {
        /// Starting latitude, applied as a device location fix
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Starting longitude, applied as a device location fix
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Search radius in meters (saved as the new preference)
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Show live availability for one car park
    Availability {
        /// Car park number (e.g., ACB)
        id: String,
    },

    /// Manage bookmarked car parks
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands need neither logging nor the runtime
    let command = match cli.command {
        Commands::Config { command } => return commands::config::run(command),
        other => other,
    };

    let runner = CliRunner::new(cli.debug, cli.verbose)?;

    match command {
        Commands::Search {
            lat,
            lon,
            radius,
            live,
        } => commands::search::run(
            &runner,
            SearchArgs {
                lat,
                lon,
                radius,
                live,
            },
        ),
        Commands::Watch { lat, lon, radius } => {
            commands::watch::run(&runner, WatchArgs { lat, lon, radius })
        }
        Commands::Availability { id } => commands::availability::run(&runner, &id),
        Commands::Bookmarks { command } => commands::bookmarks::run(&runner, command),
        Commands::Config { command } => commands::config::run(command),
    }
}
