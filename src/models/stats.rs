//! Daily score series for the dashboard chart.
//!
//! Completion records are bucketed by the calendar day of their completion
//! timestamp and their awarded points summed per day.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::ActivityInstance;

/// Timestamp format the backend uses for `fechaCompletada`.
pub const COMPLETION_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// [`COMPLETION_DATE_FORMAT`] after the leading weekday.
const COMPLETION_DATE_BODY: &str = "%d %b %Y %H:%M:%S GMT";

/// Axis label format ("01 Jan").
pub const DAY_LABEL_FORMAT: &str = "%d %b";

/// Parallel label/value series, days strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreChart {
    pub days: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl ScoreChart {
    /// Aggregate completion records into per-day totals.
    ///
    /// Records whose timestamp does not match [`COMPLETION_DATE_FORMAT`] are
    /// skipped; they do not affect other days. The weekday name must be a
    /// weekday but need not agree with the date. The wall-clock date of the
    /// timestamp is used as-is, without time-zone conversion.
    pub fn from_completions<'a>(records: impl IntoIterator<Item = &'a ActivityInstance>) -> Self {
        let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            match parse_completion_day(&record.completed_at) {
                Some(day) => *by_day.entry(day).or_insert(0) += record.points_awarded,
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped completion records with unparsable dates");
        }

        let mut chart = Self::default();
        for (day, total) in by_day {
            chart.days.push(day);
            chart.labels.push(day.format(DAY_LABEL_FORMAT).to_string());
            chart.values.push(total);
        }
        chart
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, value)` pairs in day order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, i64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn total(&self) -> i64 {
        self.values.iter().sum()
    }
}

/// Calendar day of a backend completion timestamp.
///
/// The date is taken from the day-month-year part, so a record whose weekday
/// disagrees with its date still lands on that date.
fn parse_completion_day(raw: &str) -> Option<NaiveDate> {
    let (weekday, body) = raw.trim().split_once(", ")?;
    weekday.parse::<Weekday>().ok()?;
    NaiveDateTime::parse_from_str(body, COMPLETION_DATE_BODY)
        .ok()
        .map(|dt| dt.date())
}
