//! End-to-end analysis run
//!
//! The notebook workflow as one call: flatten the three metrics over a date
//! range, combine steps with sleep, derive the previous-night columns, and
//! fit the two models — does previous-night sleep predict activity
//! (`steps ~ hours_prev`), and does a short night get repaid the next night
//! (`hours_diff ~ hours_prev`).

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::dates::DateRange;
use crate::error::FitpulseError;
use crate::features::ActivityTable;
use crate::flatten::{flatten_heart_rate, flatten_sleep_hours, flatten_steps};
use crate::metric::Metric;
use crate::regress::{fit_ols, OlsFit};
use crate::stats::{weekday_counts, Summary};

/// Results of a full analysis run over one date range
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub range: DateRange,
    pub days: usize,
    pub heart_bpm: Summary,
    pub sleep_hours: Summary,
    pub steps: Summary,
    pub weekday_counts: Vec<(&'static str, usize)>,
    /// `steps ~ hours_prev`
    pub activity_model: OlsFit,
    /// `hours_diff ~ hours_prev`
    pub sleep_deficit_model: OlsFit,
}

/// Flatten, combine, and fit over all files under `data_dir`.
///
/// Every date in the range must have a heart-rate, sleep, and steps file;
/// any gap aborts the run. The regressions need at least four days (three
/// rows with a defined previous night).
pub fn run_analysis(data_dir: &Path, range: &DateRange) -> Result<AnalysisReport, FitpulseError> {
    let heart = flatten_heart_rate(data_dir, range)?;
    let sleep = flatten_sleep_hours(data_dir, range)?;
    let steps = flatten_steps(data_dir, range)?;

    let combined = ActivityTable::combine(&steps, &sleep)?;

    let bpm_column: Vec<Option<f64>> = heart
        .values()
        .map(|sample| Some(f64::from(sample.bpm)))
        .collect();
    let dates: Vec<_> = combined.rows().iter().map(|r| r.date).collect();

    let activity_model = fit_ols(
        "steps",
        "hours_prev",
        &combined.steps_column(),
        &combined.hours_prev_column(),
    )?;
    let sleep_deficit_model = fit_ols(
        "hours_diff",
        "hours_prev",
        &combined.hours_diff_column(),
        &combined.hours_prev_column(),
    )?;

    Ok(AnalysisReport {
        range: *range,
        days: combined.len(),
        heart_bpm: describe_column(&bpm_column)?,
        sleep_hours: describe_column(&combined.hours_column())?,
        steps: describe_column(&combined.steps_column())?,
        weekday_counts: weekday_counts(&dates),
        activity_model,
        sleep_deficit_model,
    })
}

/// Descriptive statistics for a single metric over a range
pub fn describe_metric(
    data_dir: &Path,
    metric: Metric,
    range: &DateRange,
) -> Result<Summary, FitpulseError> {
    let column: Vec<Option<f64>> = match metric {
        Metric::HeartRate => flatten_heart_rate(data_dir, range)?
            .values()
            .map(|s| Some(f64::from(s.bpm)))
            .collect(),
        Metric::Sleep => flatten_sleep_hours(data_dir, range)?
            .values()
            .map(|h| Some(*h))
            .collect(),
        Metric::Steps => flatten_steps(data_dir, range)?
            .values()
            .map(|s| Some(f64::from(*s)))
            .collect(),
        Metric::FrequentActivities | Metric::LifetimeActivities => {
            return Err(FitpulseError::ConfigError(format!(
                "{} is acquisition-only and has no daily table",
                metric.as_str()
            )))
        }
    };
    describe_column(&column)
}

fn describe_column(column: &[Option<f64>]) -> Result<Summary, FitpulseError> {
    Summary::describe(column)
        .ok_or_else(|| FitpulseError::InvalidRange("no defined values to summarize".to_string()))
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Analysis {} .. {} ({} days)",
            self.range.start(),
            self.range.end(),
            self.days
        )?;
        writeln!(f, "\n-- heart rate sample (bpm) --\n{}", self.heart_bpm)?;
        writeln!(f, "\n-- sleep (hours) --\n{}", self.sleep_hours)?;
        writeln!(f, "\n-- steps --\n{}", self.steps)?;
        writeln!(f, "\n-- rows per weekday --")?;
        for (name, count) in &self.weekday_counts {
            writeln!(f, "{name:<10} {count}")?;
        }
        writeln!(f, "\n{}", self.activity_model)?;
        write!(f, "\n{}", self.sleep_deficit_model)
    }
}
