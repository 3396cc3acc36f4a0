//! Fitpulse CLI
//!
//! Commands:
//! - fetch: pull daily exports from the Fitbit Web API into the data directory
//! - report: flatten a date range and print summaries plus the two OLS fits
//! - describe: descriptive statistics for a single metric

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use fitpulse::{
    describe_metric, run_analysis, DateRange, FetchConfig, Fetcher, FitpulseError, Metric,
    FITPULSE_VERSION,
};

/// Fitpulse - pull and analyze daily Fitbit exports
#[derive(Parser)]
#[command(name = "fitpulse")]
#[command(version = FITPULSE_VERSION)]
#[command(about = "Local Fitbit archive toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily exports for a date range
    Fetch {
        /// Metric to fetch (omit for all)
        #[arg(long)]
        metric: Option<MetricArg>,

        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last date, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: String,

        /// Fitbit OAuth bearer token
        #[arg(long, env = "FITBIT_TOKEN", hide_env_values = true)]
        token: String,

        /// Data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Seconds to pause between requests (Fitbit allows 150/hour)
        #[arg(long, default_value = "30")]
        delay_secs: u64,
    },

    /// Flatten a range and print summaries and regression tables
    Report {
        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last date, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: String,

        /// Data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Descriptive statistics for one metric
    Describe {
        /// Metric to describe
        #[arg(long)]
        metric: MetricArg,

        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last date, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: String,

        /// Data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    HeartRate,
    Sleep,
    Steps,
    FrequentActivities,
    LifetimeActivities,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::HeartRate => Metric::HeartRate,
            MetricArg::Sleep => Metric::Sleep,
            MetricArg::Steps => Metric::Steps,
            MetricArg::FrequentActivities => Metric::FrequentActivities,
            MetricArg::LifetimeActivities => Metric::LifetimeActivities,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FitpulseError> {
    match cli.command {
        Commands::Fetch {
            metric,
            start,
            end,
            token,
            data_dir,
            delay_secs,
        } => {
            let range = DateRange::parse(&start, &end)?;
            let config = FetchConfig::new(token, data_dir)
                .with_delay(Duration::from_secs(delay_secs));
            let fetcher = Fetcher::new(config)?;

            let reports = match metric {
                Some(m) => vec![fetcher.fetch_range(m.into(), &range)?],
                None => fetcher.fetch_all(&range)?,
            };
            for report in reports {
                println!(
                    "{}: saved {} of {} days",
                    report.metric.as_str(),
                    report.saved.len(),
                    range.days()
                );
                for date in &report.failed {
                    println!("  failed: {date}");
                }
            }
            Ok(())
        }

        Commands::Report {
            start,
            end,
            data_dir,
            json,
        } => {
            let range = DateRange::parse(&start, &end)?;
            let report = run_analysis(&data_dir, &range)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            Ok(())
        }

        Commands::Describe {
            metric,
            start,
            end,
            data_dir,
        } => {
            let range = DateRange::parse(&start, &end)?;
            let summary = describe_metric(&data_dir, metric.into(), &range)?;
            println!("{summary}");
            Ok(())
        }
    }
}
