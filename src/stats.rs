//! Descriptive statistics
//!
//! Stand-in for the notebook's `describe()` and weekday countplot stages:
//! count, mean, sample standard deviation, min, quartiles, and max per
//! column, plus row counts per weekday.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::dates::weekday_name;

pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Five-number summary plus count, mean, and sample standard deviation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize the defined values of a column. Returns `None` when no
    /// value is defined.
    pub fn describe(column: &[Option<f64>]) -> Option<Summary> {
        let mut values: Vec<f64> = column.iter().flatten().copied().collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Summary {
            count,
            mean,
            std,
            min: values[0],
            q25: percentile(&values, 0.25),
            median: percentile(&values, 0.5),
            q75: percentile(&values, 0.75),
            max: values[count - 1],
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count  {:>10}", self.count)?;
        writeln!(f, "mean   {:>10.3}", self.mean)?;
        writeln!(f, "std    {:>10.3}", self.std)?;
        writeln!(f, "min    {:>10.3}", self.min)?;
        writeln!(f, "25%    {:>10.3}", self.q25)?;
        writeln!(f, "50%    {:>10.3}", self.median)?;
        writeln!(f, "75%    {:>10.3}", self.q75)?;
        write!(f, "max    {:>10.3}", self.max)
    }
}

/// Linear-interpolation percentile over sorted values, `q` in [0, 1]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Count rows per weekday, Monday first
pub fn weekday_counts(dates: &[NaiveDate]) -> Vec<(&'static str, usize)> {
    WEEKDAY_ORDER
        .iter()
        .map(|name| {
            let count = dates.iter().filter(|d| weekday_name(**d) == *name).count();
            (*name, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_known_values() {
        let column: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(5.0), Some(5.0), Some(7.0), Some(9.0)];
        let summary = Summary::describe(&column).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, 5.0);
        // Sample std of the classic 2,4,4,4,5,5,7,9 set: sqrt(32/7)
        assert!((summary.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.median, 4.5);
    }

    #[test]
    fn test_describe_skips_undefined() {
        let column = vec![None, Some(7.0), Some(8.0)];
        let summary = Summary::describe(&column).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 7.5);
    }

    #[test]
    fn test_describe_empty_column() {
        assert_eq!(Summary::describe(&[None, None]), None);
        assert_eq!(Summary::describe(&[]), None);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let column: Vec<Option<f64>> = (1..=4).map(|v| Some(v as f64)).collect();
        let summary = Summary::describe(&column).unwrap();
        assert_eq!(summary.q25, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q75, 3.25);
    }

    #[test]
    fn test_weekday_counts() {
        // 2018-01-01 is a Monday; eight consecutive days wrap to a second Monday.
        let dates: Vec<NaiveDate> = (1..=8)
            .map(|day| NaiveDate::from_ymd_opt(2018, 1, day).unwrap())
            .collect();
        let counts = weekday_counts(&dates);
        assert_eq!(counts[0], ("Monday", 2));
        assert_eq!(counts[6], ("Sunday", 1));
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), 8);
    }
}
