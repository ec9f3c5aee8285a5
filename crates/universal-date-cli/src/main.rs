//! udate: render dates as absolute or relative strings.
//!
//! ```text
//! udate human "2021-01-01 15:30:00"             # January 1, 2021 at 3:30 PM
//! udate human 1609459200 --format %d-%m-%Y      # 01-01-2021
//! udate ago "+45 minutes"                       # in 1 hour
//! udate ago "2026-02-18 12:30" --json           # breakdown + phrase
//! udate convert "2021-01-01 12:00" --to America/New_York
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use universal_date::{
    format_relative, CalendarBreakdown, Clock, Direction, FixedClock, SystemClock, UniversalDate,
    DEFAULT_TIMEZONE,
};

#[derive(Parser)]
#[command(name = "udate")]
#[command(about = "Render dates as absolute or relative (\"3 hours ago\") strings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone used to read wall-clock input and render output
    #[arg(long, global = true, env = "UDATE_TZ", default_value = DEFAULT_TIMEZONE)]
    tz: String,

    /// Reference instant used as "now" (defaults to the system clock)
    #[arg(long, global = true, allow_hyphen_values = true)]
    now: Option<String>,

    /// Log resolution steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Absolute rendering ("January 1, 2021 at 3:30 PM")
    Human {
        /// Date: timestamp, date text, or relative expression
        #[arg(default_value = "now", allow_hyphen_values = true)]
        date: String,

        /// strftime pattern (e.g., "%d-%m-%Y")
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Relative rendering ("3 hours ago", "in 2 days", "soon")
    Ago {
        /// Date: timestamp, date text, or relative expression
        #[arg(default_value = "now", allow_hyphen_values = true)]
        date: String,

        /// Print the calendar breakdown alongside the phrase as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the same instant in another timezone
    Convert {
        /// Date: timestamp, date text, or relative expression
        #[arg(allow_hyphen_values = true)]
        date: String,

        /// Target IANA timezone
        #[arg(long)]
        to: String,

        /// strftime pattern (e.g., "%Y-%m-%d %H:%M %Z")
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Serialize)]
struct AgoReport {
    phrase: String,
    direction: Direction,
    timestamp: i64,
    timezone: &'static str,
    breakdown: CalendarBreakdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let clock = reference_clock(cli.now.as_deref(), &cli.tz)?;

    match cli.command {
        Commands::Human { date, format } => {
            let date = load(&date, &cli.tz, clock.as_ref())?;
            println!("{}", date.to_human(format.as_deref())?);
        }
        Commands::Ago { date, json } => {
            let date = load(&date, &cli.tz, clock.as_ref())?;
            let breakdown = date.breakdown_at(clock.as_ref());
            let phrase = format_relative(&breakdown);
            tracing::debug!(?breakdown, phrase = %phrase, "relative rendering");

            if json {
                let report = AgoReport {
                    phrase,
                    direction: breakdown.direction(),
                    timestamp: date.timestamp(),
                    timezone: date.timezone(),
                    breakdown,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{phrase}");
            }
        }
        Commands::Convert { date, to, format } => {
            let date = load(&date, &cli.tz, clock.as_ref())?;
            let converted = date
                .set_timezone(&to)
                .with_context(|| format!("cannot convert to '{to}'"))?;
            tracing::debug!(from = %cli.tz, to = %to, "converted timezone");
            println!("{}", converted.to_human(format.as_deref())?);
        }
    }

    Ok(())
}

/// The clock that relative input and output are measured against.
fn reference_clock(now: Option<&str>, tz: &str) -> Result<Box<dyn Clock>> {
    match now {
        Some(text) => {
            let anchor = UniversalDate::new(text, Some(tz))
                .with_context(|| format!("invalid --now value '{text}'"))?;
            tracing::debug!(now = %anchor.date_time().to_rfc3339(), "pinned reference clock");
            Ok(Box::new(FixedClock(anchor.time_point().instant())))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn load(text: &str, tz: &str, clock: &dyn Clock) -> Result<UniversalDate> {
    let date = UniversalDate::with_clock(text, Some(tz), clock)
        .with_context(|| format!("failed to read date '{text}'"))?;
    tracing::debug!(
        input = text,
        timezone = tz,
        timestamp = date.timestamp(),
        "resolved date"
    );
    Ok(date)
}
