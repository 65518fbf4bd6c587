//! Year-window and validity selection over normalized records.

use crate::error::{DatasetError, Result};
use crate::types::AccidentRecord;
use serde::Serialize;
use tracing::debug;

/// Inclusive Gregorian year window. Only [`YearRange::new`] builds one, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Build an inclusive range, rejecting `start > end`.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(DatasetError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// `年份: 2018` for a single year, `年份: 2018~2021` otherwise.
    pub fn label(&self) -> String {
        if self.start == self.end {
            format!("年份: {}", self.start)
        } else {
            format!("年份: {}~{}", self.start, self.end)
        }
    }
}

/// Whether a record can be charted at all, independent of the year window.
pub fn is_chartable(record: &AccidentRecord) -> bool {
    matches!(record.people_amount, Some(n) if n > 0)
        && !record.main_category.is_empty()
        && !record.disaster_types.is_empty()
}

/// Order-preserving selection of records inside `range` that pass
/// [`is_chartable`].
pub fn filter_records(records: &[AccidentRecord], range: YearRange) -> Vec<&AccidentRecord> {
    let selected: Vec<&AccidentRecord> = records
        .iter()
        .filter(|r| range.contains(r.year()) && is_chartable(r))
        .collect();
    debug!(
        "range {}..={}: {} of {} records selected",
        range.start,
        range.end,
        selected.len(),
        records.len()
    );
    selected
}
