//! Date-indexed tables
//!
//! A `DailyTable` holds one row per calendar date, in ascending date order.
//! Flattening guarantees exactly one row for every date in the requested
//! range; downstream derived columns and regressions rely on that positional
//! contract.

use chrono::NaiveDate;
use serde::Serialize;

/// One row of a daily table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// Date-indexed table: one row per date, ascending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTable<T> {
    rows: Vec<DailyRow<T>>,
}

impl<T> DailyTable<T> {
    /// Build a table from rows already in ascending date order.
    ///
    /// Callers (the flattening routines) iterate the date range in order, so
    /// this only debug-asserts the invariant rather than re-sorting.
    pub(crate) fn from_ordered_rows(rows: Vec<DailyRow<T>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DailyRow<T>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyRow<T>> {
        self.rows.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|r| &r.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_accessors() {
        let table = DailyTable::from_ordered_rows(vec![
            DailyRow { date: d("2018-01-01"), value: 7.0 },
            DailyRow { date: d("2018-01-02"), value: 8.0 },
        ]);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.dates().collect::<Vec<_>>(), vec![d("2018-01-01"), d("2018-01-02")]);
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![7.0, 8.0]);
    }
}
