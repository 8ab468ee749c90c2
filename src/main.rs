//! Beacon Colors - custom colors for palette-limited map beacons
//!
//! Runs the interactive beacon demo by default; subcommands edit the
//! override file headlessly.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use beacon_colors::cli::Command;
use beacon_colors::config::Config;
use beacon_colors::constants::APP_NAME;
use beacon_colors::logging;
use beacon_colors::store::OverrideStore;
use beacon_colors::tui;

/// Beacon Colors - custom colors for palette-limited map beacons
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the override file and the log
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = cli.data_dir {
        config.paths.data_dir = Some(dir);
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config, cli.verbose),
        Command::List(args) => {
            logging::init_stderr_logging(cli.verbose)?;
            let store = OverrideStore::open(&config)?;
            args.execute(&store, &mut io::stdout().lock())
        }
        Command::Set(args) => {
            logging::init_stderr_logging(cli.verbose)?;
            let mut store = OverrideStore::open(&config)?;
            args.execute(&mut store, &mut io::stdout().lock())
        }
        Command::Clear(args) => {
            logging::init_stderr_logging(cli.verbose)?;
            let mut store = OverrideStore::open(&config)?;
            args.execute(&mut store, &mut io::stdout().lock())
        }
    }
}

fn run_tui(config: Config, verbose: bool) -> Result<()> {
    logging::init_file_logging(&config.log_path()?, verbose)?;

    let store = OverrideStore::open(&config)?;
    let mut app = tui::App::new(config, store)
        .with_context(|| format!("Failed to start {APP_NAME}"))?;

    let mut terminal = tui::setup_terminal()?;
    let result = tui::run_tui(&mut app, &mut terminal);
    tui::restore_terminal(terminal)?;

    // Hooks come out of the host before the store goes away
    let tui::App { mut host, layer, .. } = app;
    layer.uninstall(&mut host);

    result
}
