//! Owns the full record collection and answers render requests.
//!
//! The collection is loaded once, from all yearly sources concurrently, and
//! is never mutated afterwards. Each render request filters, aggregates and
//! ranks from scratch.

use crate::config::NormalizeConfig;
use crate::error::{DatasetError, Result};
use crate::filter::filter_records;
use crate::loader::{load_source, LoadReport};
use crate::reports::{
    aggregate_by_category, aggregate_by_disaster_type, generate_summary, rank_descending,
};
use crate::types::{AccidentRecord, ChartTables, YearRange};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
}

impl Dataset {
    /// Build a dataset from already-normalized records, in the given order.
    pub fn from_records(records: Vec<AccidentRecord>) -> Self {
        Self { records }
    }

    /// Load every source concurrently and concatenate them in source order.
    ///
    /// Any source failing aborts the whole load.
    pub async fn load(
        sources: &[PathBuf],
        config: &NormalizeConfig,
    ) -> Result<(Self, LoadReport)> {
        if sources.is_empty() {
            return Err(DatasetError::NoSources);
        }
        let config = Arc::new(config.clone());

        let tasks = sources.iter().cloned().map(|path| {
            let config = Arc::clone(&config);
            async move {
                let task_path = path.clone();
                tokio::task::spawn_blocking(move || load_source(&task_path, &config))
                    .await
                    .map_err(|e| DatasetError::source_load(&path, e))?
            }
        });
        let loaded = try_join_all(tasks).await?;

        let mut report = LoadReport::default();
        let mut records = Vec::new();
        for (path, (mut part, part_report)) in sources.iter().zip(loaded) {
            info!(
                "loaded {}: {} rows, {} kept",
                path.display(),
                part_report.total_rows,
                part_report.kept_rows
            );
            report.merge(&part_report);
            records.append(&mut part);
        }
        Ok((Self { records }, report))
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest year present, or `None` for an empty dataset.
    pub fn year_span(&self) -> Option<YearRange> {
        let min = self.records.iter().map(AccidentRecord::year).min()?;
        let max = self.records.iter().map(AccidentRecord::year).max()?;
        YearRange::new(min, max).ok()
    }

    /// Produce both ranked tables for `start..=end`.
    ///
    /// An inverted range is rejected before any work is done.
    pub fn render(&self, start: i32, end: i32) -> Result<ChartTables> {
        let range = YearRange::new(start, end)?;
        Ok(self.render_range(range))
    }

    pub fn render_range(&self, range: YearRange) -> ChartTables {
        let selected = filter_records(&self.records, range);

        let mut by_category = aggregate_by_category(&selected);
        rank_descending(&mut by_category);
        let mut by_disaster_type = aggregate_by_disaster_type(&selected);
        rank_descending(&mut by_disaster_type);

        let summary = generate_summary(range, &selected, &by_category, &by_disaster_type);
        debug!(
            "rendered {}..={}: {} categories, {} disaster types",
            range.start(),
            range.end(),
            by_category.len(),
            by_disaster_type.len()
        );
        ChartTables {
            range,
            by_category,
            by_disaster_type,
            summary,
        }
    }
}
