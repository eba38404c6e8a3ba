//! Binary entry point: resolve the application home, read the config, bring
//! up logging and the SQLite store, then hand control to the terminal UI.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wedding_song_planner::logging::init_logging;
use wedding_song_planner::{load_catalog, open_database, run_app, App, AppConfig, Paths};

/// Command-line arguments for the planner.
#[derive(Parser, Debug)]
#[command(name = "wedding-song-planner")]
#[command(about = "Choose the songs for each moment of a wedding ceremony")]
#[command(version)]
struct Args {
    /// Directory holding the database, config and logs
    #[arg(long, env = "WEDDING_PLANNER_HOME")]
    home: Option<PathBuf>,

    /// Config file to read instead of <home>/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "wedding_song_planner=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Finalize incomplete selections without asking first
    #[arg(long)]
    no_confirm: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let paths = Paths::resolve(args.home.as_deref())?;
    let config_file = args.config.unwrap_or_else(|| paths.config_file.clone());
    let mut config = AppConfig::load(&config_file)?;
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if args.no_confirm {
        config.confirm_incomplete = false;
    }

    let _log_guard = init_logging(&paths.log_dir, &config.log_level)?;
    info!(home = %paths.home.display(), config = %config_file.display(), "starting planner");

    let conn = open_database(&paths.db_file)
        .with_context(|| format!("failed to open {}", paths.db_file.display()))?;
    let catalog = load_catalog(&conn, config.seed_catalog)?;
    if catalog.is_empty() {
        anyhow::bail!("The song catalog is empty. Enable seed_catalog or add songs first.");
    }

    let output = config.output_settings(&paths);
    let mut app = App::new(conn, catalog, config, output);
    run_app(&mut app)
}
