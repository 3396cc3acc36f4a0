//! Fitpulse - Local Fitbit archive toolkit
//!
//! Fitpulse pulls daily exports from the Fitbit Web API and flattens them
//! into date-indexed tables for analysis: one authenticated request per
//! (metric, date) on the way in, one row per date on the way out, then
//! descriptive statistics and two small sleep/activity regressions.
//!
//! ## Modules
//!
//! - **Acquisition** ([`fetch`]): per-date fetch with fixed pacing, one JSON
//!   file per (metric, date)
//! - **Flattening** ([`flatten`]): daily files → [`table::DailyTable`],
//!   parameterized by metric, key path, and extractor
//! - **Analysis** ([`features`], [`stats`], [`regress`], [`report`]):
//!   derived sleep columns, summaries, and OLS fits

pub mod dates;
pub mod error;
pub mod features;
pub mod fetch;
pub mod flatten;
pub mod keypath;
pub mod metric;
pub mod regress;
pub mod report;
pub mod stats;
pub mod table;

pub use dates::DateRange;
pub use error::FitpulseError;
pub use features::ActivityTable;
pub use fetch::{FetchConfig, FetchReport, Fetcher};
pub use flatten::{flatten, flatten_heart_rate, flatten_sleep_hours, flatten_steps, FlattenSpec};
pub use keypath::KeyPath;
pub use metric::Metric;
pub use regress::{fit_ols, OlsFit};
pub use report::{describe_metric, run_analysis, AnalysisReport};
pub use table::{DailyRow, DailyTable};

/// Crate version embedded in CLI output
pub const FITPULSE_VERSION: &str = env!("CARGO_PKG_VERSION");
