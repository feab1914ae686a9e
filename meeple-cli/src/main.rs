//! meeple CLI
//!
//! Suggests games from a BoardGameGeek collection for a given player count.

use std::io::Write;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

mod commands;
mod error;
mod progress;

pub(crate) use error::CliError;

#[derive(Parser)]
#[command(name = "meeple")]
#[command(about = "Find games in a BoardGameGeek collection that suit your group", long_about = None)]
struct Cli {
    /// Hide progress and informational logs; results are still printed
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// More detail (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest games from a user's collection
    Suggest {
        /// BoardGameGeek username
        owner: String,

        /// Number of players at the table
        #[arg(short, long)]
        players: u32,

        /// Print the enriched records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up how a single game plays at a player count
    Game {
        /// BoardGameGeek object id
        id: String,

        /// Number of players at the table
        #[arg(short, long)]
        players: u32,

        /// Print the enriched record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective settings and their sources
    Show,

    /// Print the settings file path
    Path,
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Suggest {
            owner,
            players,
            json,
        } => commands::suggest::run_suggest(&owner, players, json, cli.quiet),
        Commands::Game { id, players, json } => {
            commands::game::run_game(&id, players, json, cli.quiet)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}
