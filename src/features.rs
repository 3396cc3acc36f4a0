//! Derived columns over flattened tables
//!
//! Combines the steps and sleep-hours tables for one date range and derives
//! the regression inputs: previous night's sleep (`hours_prev`, a positional
//! shift by one row) and the night-to-night change (`hours_diff`). The first
//! row has no previous night, so both derived columns are undefined there.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::weekday_name;
use crate::error::FitpulseError;
use crate::table::DailyTable;

/// One day of combined sleep and activity data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub steps: u32,
    pub hours: f64,
    /// Hours slept the previous night; undefined for the first row
    pub hours_prev: Option<f64>,
    /// Change in sleep versus the previous night; undefined for the first row
    pub hours_diff: Option<f64>,
}

/// Combined sleep/activity table with derived columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityTable {
    rows: Vec<DailyActivity>,
}

impl ActivityTable {
    /// Combine a steps table and a sleep-hours table built from the same
    /// date range.
    ///
    /// Assignment is positional, matching the source workflow; as a guard,
    /// the two tables must carry identical date columns. Tables built from
    /// the same range always do.
    pub fn combine(
        steps: &DailyTable<u32>,
        hours: &DailyTable<f64>,
    ) -> Result<Self, FitpulseError> {
        if steps.len() != hours.len() {
            return Err(FitpulseError::Misaligned(format!(
                "steps has {} rows, sleep has {}",
                steps.len(),
                hours.len()
            )));
        }
        for (s, h) in steps.rows().iter().zip(hours.rows()) {
            if s.date != h.date {
                return Err(FitpulseError::Misaligned(format!(
                    "row dates differ: steps {} vs sleep {}",
                    s.date, h.date
                )));
            }
        }

        let mut rows = Vec::with_capacity(steps.len());
        let mut prev_hours: Option<f64> = None;
        for (s, h) in steps.rows().iter().zip(hours.rows()) {
            rows.push(DailyActivity {
                date: s.date,
                day_name: weekday_name(s.date),
                steps: s.value,
                hours: h.value,
                hours_prev: prev_hours,
                hours_diff: prev_hours.map(|p| h.value - p),
            });
            prev_hours = Some(h.value);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DailyActivity] {
        &self.rows
    }

    /// Step counts as floats, for regression
    pub fn steps_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| Some(f64::from(r.steps))).collect()
    }

    pub fn hours_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| Some(r.hours)).collect()
    }

    pub fn hours_prev_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.hours_prev).collect()
    }

    pub fn hours_diff_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.hours_diff).collect()
    }
}
