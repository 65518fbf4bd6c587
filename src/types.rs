use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row of a yearly accident CSV, exactly as it appears in the file.
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "發生日期")]
    pub occurrence_date: Option<String>,
    #[serde(rename = "行業別")]
    pub industry: Option<String>,
    #[serde(rename = "罹災人數")]
    pub victim_count: Option<String>,
    #[serde(rename = "事業單位")]
    pub company: Option<String>,
    #[serde(rename = "勞動檢查機構")]
    pub agency: Option<String>,
    #[serde(rename = "業主")]
    pub boss: Option<String>,
    #[serde(rename = "災害類型")]
    pub disaster_types: Option<String>,
}

/// Which of the two industry-classification encodings a value used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFormat {
    /// `<main>(<sub>)`
    Parenthesized,
    /// `<letter><main>-<digits><sub>`
    Coded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundCategory {
    pub format: CategoryFormat,
    pub main: String,
    pub sub: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    pub main_category: String,
    pub sub_category: Option<String>,
    pub date: NaiveDate,
    /// `None` when the source count could not be parsed.
    pub people_amount: Option<u32>,
    pub company: Option<String>,
    pub agency: Option<String>,
    pub boss: Option<String>,
    pub disaster_types: Vec<String>,
}

impl AccidentRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// A single bar: a category or disaster type and its victim total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub people_amount: u64,
}

pub use crate::filter::YearRange;

/// Everything the presentation layer needs for one render request.
#[derive(Debug, Clone)]
pub struct ChartTables {
    pub range: YearRange,
    pub by_category: Vec<AggregateRow>,
    pub by_disaster_type: Vec<AggregateRow>,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub start_year: i32,
    pub end_year: i32,
    pub total_records: usize,
    pub total_people: u64,
    pub total_categories: usize,
    pub total_disaster_types: usize,
}

/// Console row for a ranked bar chart.
#[derive(Debug, Clone, Tabled)]
pub struct BarRow {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "People")]
    pub people: String,
    #[tabled(rename = "Bar")]
    pub bar: String,
}
