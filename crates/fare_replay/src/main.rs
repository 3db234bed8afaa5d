use std::path::PathBuf;
use std::process::exit;

use clap::{ArgGroup, Parser, ValueEnum};
use fare_core::TamperingThreshold;
use fare_replay::{replay, ReplayOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fare_replay",
    about = "Replay a recorded trip and check the charged fare against the tariff"
)]
#[command(group(ArgGroup::new("period").args(["night", "day"])))]
struct Cli {
    /// Position fixes (.json array or .csv with a header row)
    #[arg(long)]
    fixes: PathBuf,
    /// Inertial samples (.json array)
    #[arg(long)]
    samples: Option<PathBuf>,
    /// Engine configuration overrides (.json)
    #[arg(long, env = "FARE_CONFIG")]
    config: Option<PathBuf>,
    /// Fare shown on the meter
    #[arg(long)]
    charged: Option<f64>,
    /// Packages larger than 60x40 cm
    #[arg(long, default_value_t = 0)]
    luggage: u32,
    #[arg(long, value_enum)]
    threshold: Option<ThresholdArg>,
    /// Price as a night trip
    #[arg(long)]
    night: bool,
    /// Price as a day trip
    #[arg(long)]
    day: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThresholdArg {
    /// 5%
    Strict,
    /// 10%
    Standard,
    /// 15%
    Lenient,
}

impl From<ThresholdArg> for TamperingThreshold {
    fn from(arg: ThresholdArg) -> Self {
        match arg {
            ThresholdArg::Strict => TamperingThreshold::Strict,
            ThresholdArg::Standard => TamperingThreshold::Standard,
            ThresholdArg::Lenient => TamperingThreshold::Lenient,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = ReplayOptions {
        fixes: cli.fixes,
        samples: cli.samples,
        config: cli.config,
        charged_fare: cli.charged,
        luggage_count: cli.luggage,
        threshold: cli.threshold.map(Into::into),
        night: match (cli.night, cli.day) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
    };

    let report = match replay(&options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("replay failed: {err}");
            exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("could not serialize report: {err}");
                exit(1);
            }
        }
    } else {
        println!("{}", report.to_text());
    }

    if report.is_tampered() {
        exit(2);
    }
}
