//! Flattening: per-date JSON files into date-indexed tables
//!
//! The core routine of the toolkit. Given a metric, a date range, a key path
//! into the daily document, and an extractor, it reads one file per date and
//! produces a `DailyTable` with exactly one row per date, ascending.
//!
//! A missing file or an unresolvable key path for any date aborts the whole
//! run; no partial table is ever returned. Re-running over the same files
//! yields an identical table.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::dates::DateRange;
use crate::error::FitpulseError;
use crate::keypath::KeyPath;
use crate::metric::Metric;
use crate::table::{DailyRow, DailyTable};

/// Key path templates for the three flattened metrics
pub const HEART_RATE_PATH: &str = "activities-heart-intraday.dataset[1]";
pub const SLEEP_PATH: &str = "summary.totalTimeInBed";
pub const STEPS_PATH: &str = "activities-steps[0].value";

/// Configuration for one metric's flattening pass: which files to read and
/// where the value of interest lives inside each document.
#[derive(Debug, Clone)]
pub struct FlattenSpec {
    pub metric: Metric,
    pub path: KeyPath,
}

impl FlattenSpec {
    pub fn new(metric: Metric, path_template: &str) -> Result<Self, FitpulseError> {
        Ok(Self {
            metric,
            path: path_template.parse()?,
        })
    }
}

/// Flatten one metric's daily files into a table.
///
/// For each date in `range`, ascending: read the file, decode it, navigate
/// `spec.path`, and apply `extract` to the value found there. The extractor
/// receives the date alongside the value so it can report which file held an
/// unexpected shape.
pub fn flatten<T, F>(
    data_dir: &Path,
    spec: &FlattenSpec,
    range: &DateRange,
    extract: F,
) -> Result<DailyTable<T>, FitpulseError>
where
    F: Fn(&Value, NaiveDate) -> Result<T, FitpulseError>,
{
    let mut rows = Vec::with_capacity(range.days());
    for date in range.iter() {
        let document = read_daily_document(data_dir, spec.metric, date)?;
        let found = spec
            .path
            .navigate(&document)
            .map_err(|segment| FitpulseError::MissingPath {
                date,
                path: spec.path.as_str().to_string(),
                segment: segment.to_string(),
            })?;
        let value = extract(found, date)?;
        rows.push(DailyRow { date, value });
    }
    debug!(
        metric = spec.metric.as_str(),
        rows = rows.len(),
        "flattened daily files"
    );
    Ok(DailyTable::from_ordered_rows(rows))
}

/// Read and decode one daily file.
///
/// Files written by the original exporter hold a JSON string whose content is
/// itself the JSON document, so a second decode is applied whenever the first
/// parse yields a string. Files written by this crate's fetcher decode once.
fn read_daily_document(
    data_dir: &Path,
    metric: Metric,
    date: NaiveDate,
) -> Result<Value, FitpulseError> {
    let path = metric.file_path(data_dir, date);
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            FitpulseError::MissingFile {
                date,
                file: path.display().to_string(),
            }
        } else {
            FitpulseError::IoError(e)
        }
    })?;

    let parsed: Value = serde_json::from_str(&content)?;
    match parsed {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        other => Ok(other),
    }
}

/// One intraday heart-rate sample
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct HeartRateSample {
    pub time: String,
    #[serde(rename = "value", alias = "bpm")]
    pub bpm: u32,
}

/// Flatten heart-rate files: the second intraday sample of each day
pub fn flatten_heart_rate(
    data_dir: &Path,
    range: &DateRange,
) -> Result<DailyTable<HeartRateSample>, FitpulseError> {
    let spec = FlattenSpec::new(Metric::HeartRate, HEART_RATE_PATH)?;
    flatten(data_dir, &spec, range, |value, date| {
        serde_json::from_value(value.clone()).map_err(|e| FitpulseError::ExtractError {
            date,
            reason: format!("intraday sample: {e}"),
        })
    })
}

/// Flatten sleep files: total time in bed, converted from minutes to hours
pub fn flatten_sleep_hours(
    data_dir: &Path,
    range: &DateRange,
) -> Result<DailyTable<f64>, FitpulseError> {
    let spec = FlattenSpec::new(Metric::Sleep, SLEEP_PATH)?;
    flatten(data_dir, &spec, range, |value, date| {
        let minutes = value.as_f64().ok_or_else(|| FitpulseError::ExtractError {
            date,
            reason: format!("totalTimeInBed is not a number: {value}"),
        })?;
        Ok(minutes / 60.0)
    })
}

/// Flatten step files: the daily step count, string-encoded upstream
pub fn flatten_steps(
    data_dir: &Path,
    range: &DateRange,
) -> Result<DailyTable<u32>, FitpulseError> {
    let spec = FlattenSpec::new(Metric::Steps, STEPS_PATH)?;
    flatten(data_dir, &spec, range, |value, date| match value {
        Value::String(s) => s.parse::<u32>().map_err(|e| FitpulseError::ExtractError {
            date,
            reason: format!("step value '{s}': {e}"),
        }),
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as u32)
            .ok_or_else(|| FitpulseError::ExtractError {
                date,
                reason: format!("step value is not an unsigned integer: {n}"),
            }),
        other => Err(FitpulseError::ExtractError {
            date,
            reason: format!("step value is not a string or number: {other}"),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitpulseError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn write_daily(dir: &Path, metric: Metric, date: &str, doc: &Value, double_encode: bool) {
        let date = d(date);
        let path = metric.file_path(dir, date);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let content = if double_encode {
            // The original exporter stored the response body as a JSON string,
            // so the document is wrapped in a second layer of encoding.
            serde_json::to_string(&serde_json::to_string(doc).unwrap()).unwrap()
        } else {
            serde_json::to_string(doc).unwrap()
        };
        fs::write(path, content).unwrap();
    }

    fn sleep_doc(minutes: u64) -> Value {
        json!({"sleep": [], "summary": {"totalTimeInBed": minutes, "totalMinutesAsleep": minutes - 20}})
    }

    fn steps_doc(steps: &str) -> Value {
        json!({"activities-steps": [{"dateTime": "2018-01-01", "value": steps}]})
    }

    fn heart_doc() -> Value {
        json!({
            "activities-heart": [],
            "activities-heart-intraday": {
                "dataset": [
                    {"time": "00:00:00", "value": 62},
                    {"time": "00:00:05", "value": 64}
                ],
                "datasetInterval": 1,
                "datasetType": "second"
            }
        })
    }

    #[test]
    fn test_flatten_sleep_converts_minutes_to_hours() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-03").unwrap();
        write_daily(tmp.path(), Metric::Sleep, "2018-01-01", &sleep_doc(420), true);
        write_daily(tmp.path(), Metric::Sleep, "2018-01-02", &sleep_doc(480), true);
        write_daily(tmp.path(), Metric::Sleep, "2018-01-03", &sleep_doc(510), true);

        let table = flatten_sleep_hours(tmp.path(), &range).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![7.0, 8.0, 8.5]);
        assert_eq!(
            table.dates().collect::<Vec<_>>(),
            vec![d("2018-01-01"), d("2018-01-02"), d("2018-01-03")]
        );
    }

    #[test]
    fn test_single_and_double_encoded_files_yield_same_table() {
        let tmp_single = TempDir::new().unwrap();
        let tmp_double = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-01").unwrap();
        write_daily(tmp_single.path(), Metric::Sleep, "2018-01-01", &sleep_doc(480), false);
        write_daily(tmp_double.path(), Metric::Sleep, "2018-01-01", &sleep_doc(480), true);

        let single = flatten_sleep_hours(tmp_single.path(), &range).unwrap();
        let double = flatten_sleep_hours(tmp_double.path(), &range).unwrap();
        assert_eq!(single, double);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-02").unwrap();
        write_daily(tmp.path(), Metric::Steps, "2018-01-01", &steps_doc("10427"), true);
        write_daily(tmp.path(), Metric::Steps, "2018-01-02", &steps_doc("8312"), true);

        let first = flatten_steps(tmp.path(), &range).unwrap();
        let second = flatten_steps(tmp.path(), &range).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.values().copied().collect::<Vec<_>>(), vec![10427, 8312]);
    }

    #[test]
    fn test_flatten_heart_rate_picks_second_sample() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-01").unwrap();
        write_daily(tmp.path(), Metric::HeartRate, "2018-01-01", &heart_doc(), true);

        let table = flatten_heart_rate(tmp.path(), &range).unwrap();
        assert_eq!(table.len(), 1);
        let sample = &table.rows()[0].value;
        assert_eq!(sample.time, "00:00:05");
        assert_eq!(sample.bpm, 64);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-03").unwrap();
        write_daily(tmp.path(), Metric::Sleep, "2018-01-01", &sleep_doc(420), true);
        // 2018-01-02 absent
        write_daily(tmp.path(), Metric::Sleep, "2018-01-03", &sleep_doc(510), true);

        let err = flatten_sleep_hours(tmp.path(), &range).unwrap_err();
        match err {
            FitpulseError::MissingFile { date, .. } => assert_eq!(date, d("2018-01-02")),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_path_names_offending_date() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-02").unwrap();
        write_daily(tmp.path(), Metric::Sleep, "2018-01-01", &sleep_doc(420), true);
        write_daily(
            tmp.path(),
            Metric::Sleep,
            "2018-01-02",
            &json!({"summary": {"totalMinutesAsleep": 400}}),
            true,
        );

        let err = flatten_sleep_hours(tmp.path(), &range).unwrap_err();
        match err {
            FitpulseError::MissingPath { date, path, segment } => {
                assert_eq!(date, d("2018-01-02"));
                assert_eq!(path, SLEEP_PATH);
                assert_eq!(segment, "totalTimeInBed");
            }
            other => panic!("expected MissingPath, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_step_value_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let range = DateRange::parse("2018-01-01", "2018-01-01").unwrap();
        write_daily(tmp.path(), Metric::Steps, "2018-01-01", &steps_doc("not-a-number"), true);

        assert!(matches!(
            flatten_steps(tmp.path(), &range),
            Err(FitpulseError::ExtractError { .. })
        ));
    }
}
