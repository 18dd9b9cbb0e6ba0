//! Binary entry point: parse flags, bring up logging and the SQLite store,
//! resolve the viewer's membership tier, and drive the Ratatui event loop.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use env_logger::{Env, Target};
use log::info;
use spa_booking_calendar::{default_data_dir, ensure_schema, resolve_membership, run_app, App};

/// Log file written inside the data directory; the TUI owns the terminal.
const LOG_FILE_NAME: &str = "booking.log";

#[derive(Parser)]
#[command(name = "spa-booking-calendar")]
#[command(about = "Membership-aware spa booking calendar", long_about = None)]
#[command(version)]
struct Cli {
    /// Membership level to view the calendar as: none, base, premium or
    /// unlimited. Unrecognized values fall back to none. Defaults to the
    /// last level chosen in the app.
    #[arg(short, long, value_name = "TIER")]
    membership: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Directory holding the booking database and log file
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    init_logging(&data_dir, cli.debug)?;

    let conn = ensure_schema(&data_dir)?;
    let tier = resolve_membership(&conn, cli.membership.as_deref())?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    info!("starting calendar for {today} as {tier}");

    let mut app = App::new(conn, tier, today);
    run_app(&mut app)
}

/// Send `log` output to a file in the data directory. `RUST_LOG` overrides
/// the default level.
fn init_logging(data_dir: &Path, debug: bool) -> anyhow::Result<()> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;
    let log_path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env = if debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env)
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
