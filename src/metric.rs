//! Metric descriptors
//!
//! Each tracked metric maps to one Fitbit Web API endpoint, one storage
//! directory, and one file-name prefix. The daily file for a (metric, date)
//! pair is `<dir>/<prefix><YYYY-MM-DD>.json`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fitbit Web API base URL
pub const FITBIT_API_BASE: &str = "https://api.fitbit.com/1";

/// Tracked metric identifier
///
/// `FrequentActivities` and `LifetimeActivities` are acquisition-only: their
/// endpoints are not date-parameterized, and no flattening is defined for
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    HeartRate,
    Sleep,
    Steps,
    FrequentActivities,
    LifetimeActivities,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heart-rate",
            Metric::Sleep => "sleep",
            Metric::Steps => "steps",
            Metric::FrequentActivities => "frequent-activities",
            Metric::LifetimeActivities => "lifetime-activities",
        }
    }

    /// File-name prefix for daily files
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Metric::HeartRate => "HR",
            Metric::Sleep => "sleep",
            Metric::Steps => "step",
            Metric::FrequentActivities => "freq",
            Metric::LifetimeActivities => "best",
        }
    }

    /// Storage directory name under the data root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heartrate",
            Metric::Sleep => "sleep",
            Metric::Steps => "steps",
            Metric::FrequentActivities => "frequent",
            Metric::LifetimeActivities => "activities",
        }
    }

    /// File name for one day of this metric
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}{}.json", self.file_prefix(), date.format("%Y-%m-%d"))
    }

    /// Full path of the daily file under `data_dir`
    pub fn file_path(&self, data_dir: &Path, date: NaiveDate) -> PathBuf {
        data_dir.join(self.dir_name()).join(self.file_name(date))
    }

    /// Request URL for one day of this metric
    ///
    /// The frequent/lifetime activity endpoints ignore the date; the original
    /// exporter still fetched them once per day in the range.
    pub fn request_url(&self, date: NaiveDate) -> String {
        let d = date.format("%Y-%m-%d");
        match self {
            Metric::HeartRate => format!(
                "{FITBIT_API_BASE}/user/-/activities/heart/date/{d}/1d/1sec/time/00:00/23:59.json"
            ),
            Metric::Sleep => format!("{FITBIT_API_BASE}/user/-/sleep/date/{d}.json"),
            Metric::Steps => {
                format!("{FITBIT_API_BASE}/user/-/activities/steps/date/{d}/today/1d.json")
            }
            Metric::FrequentActivities => {
                format!("{FITBIT_API_BASE}/user/-/activities/frequent.json")
            }
            Metric::LifetimeActivities => format!("{FITBIT_API_BASE}/user/-/activities.json"),
        }
    }

    /// All metrics, in acquisition order
    pub fn all() -> [Metric; 5] {
        [
            Metric::HeartRate,
            Metric::Sleep,
            Metric::Steps,
            Metric::FrequentActivities,
            Metric::LifetimeActivities,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jan13() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 13).unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(Metric::HeartRate.file_name(jan13()), "HR2018-01-13.json");
        assert_eq!(Metric::Sleep.file_name(jan13()), "sleep2018-01-13.json");
        assert_eq!(Metric::Steps.file_name(jan13()), "step2018-01-13.json");
    }

    #[test]
    fn test_file_path_layout() {
        let path = Metric::Steps.file_path(Path::new("data"), jan13());
        assert_eq!(path, PathBuf::from("data/steps/step2018-01-13.json"));
    }

    #[test]
    fn test_request_urls() {
        assert_eq!(
            Metric::HeartRate.request_url(jan13()),
            "https://api.fitbit.com/1/user/-/activities/heart/date/2018-01-13/1d/1sec/time/00:00/23:59.json"
        );
        assert_eq!(
            Metric::Sleep.request_url(jan13()),
            "https://api.fitbit.com/1/user/-/sleep/date/2018-01-13.json"
        );
        assert_eq!(
            Metric::Steps.request_url(jan13()),
            "https://api.fitbit.com/1/user/-/activities/steps/date/2018-01-13/today/1d.json"
        );
        // Not date-parameterized
        assert_eq!(
            Metric::FrequentActivities.request_url(jan13()),
            "https://api.fitbit.com/1/user/-/activities/frequent.json"
        );
    }
}
