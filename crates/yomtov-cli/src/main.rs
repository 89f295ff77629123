//! `yomtov` CLI: classify dates by the Jewish calendar from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Full answer for one date (ordinary / Shabbat / holiday, next of each)
//! yomtov info --date 2025-10-02
//!
//! # Same, from a JSON request body on stdin or in a file
//! echo '{"date":"2025-10-02"}' | yomtov info
//! yomtov info -i request.json
//!
//! # Classification of a single day only
//! yomtov classify --date 2026-04-01
//!
//! # The fixed holiday table (no network)
//! yomtov holidays
//!
//! # Two-week window, joint labels, concurrent oracle calls, debug logs
//! yomtov -vv info --date 2025-09-22 --lookahead 14 --joint-label --parallel
//! ```

mod logging;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use yomtov_engine::date_info::parse_date;
use yomtov_engine::{
    date_info, holidays, DayClassifier, EngineConfig, HebcalResolver, LabelStyle, ScanMode,
};

#[derive(Parser)]
#[command(
    name = "yomtov",
    version,
    about = "Shabbat and fixed-holiday classification for Gregorian dates"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a date and find the next ordinary and sacred days
    Info {
        /// Date as YYYY-MM-DD (otherwise a JSON request body is read)
        #[arg(short, long)]
        date: Option<String>,
        /// JSON request body file (reads from stdin if omitted)
        #[arg(short, long, conflicts_with = "date")]
        input: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Classify a single date
    Classify {
        /// Date as YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Report holiday and Shabbat together in the label
        #[arg(long)]
        joint_label: bool,
    },
    /// Print the fixed holiday table
    Holidays,
}

/// Flags that override the loaded configuration.
#[derive(Args)]
struct Overrides {
    /// Days to search after the input date
    #[arg(long)]
    lookahead: Option<u32>,
    /// Report holiday and Shabbat together in the label
    #[arg(long)]
    joint_label: bool,
    /// Resolve the whole window concurrently
    #[arg(long)]
    parallel: bool,
}

impl Overrides {
    fn apply(&self, config: &mut EngineConfig) {
        if let Some(days) = self.lookahead {
            config.lookahead_days = days;
        }
        if self.joint_label {
            config.label_style = LabelStyle::Joint;
        }
        if self.parallel {
            config.scan_mode = ScanMode::Parallel;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the printed answer is an error object.
fn run(cli: Cli) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info {
            date,
            input,
            overrides,
        } => {
            overrides.apply(&mut config);
            let body = match date {
                Some(date) => json!({ "date": date }).to_string(),
                None => read_input(input.as_deref())?,
            };

            let resolver = HebcalResolver::new(config.resolver.clone());
            let response = date_info(&body, &resolver, &config);
            print_json(&response.to_json())?;
            Ok(!response.is_error())
        }
        Commands::Classify { date, joint_label } => {
            let date = match parse_date(&date) {
                Ok(date) => date,
                Err(e) => {
                    print_json(&json!({ "error": e.to_string() }))?;
                    return Ok(false);
                }
            };
            if joint_label {
                config.label_style = LabelStyle::Joint;
            }

            let classifier = DayClassifier::new(
                HebcalResolver::new(config.resolver.clone()),
                config.label_style,
            );
            match classifier.classify(date) {
                Ok(day) => {
                    print_json(&serde_json::to_value(&day)?)?;
                    Ok(true)
                }
                Err(e) => {
                    print_json(&json!({ "error": e.to_string() }))?;
                    Ok(false)
                }
            }
        }
        Commands::Holidays => {
            let entries: Vec<Value> = holidays::entries()
                .iter()
                .map(|h| json!({ "month": h.month.name(), "day": h.day, "name": h.name }))
                .collect();
            print_json(&json!({ "version": holidays::TABLE_VERSION, "holidays": entries }))?;
            Ok(true)
        }
    }
}

/// Defaults, then the optional TOML file, then `YOMTOV_*` environment overrides.
fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
