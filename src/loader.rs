use crate::config::NormalizeConfig;
use crate::error::{DatasetError, RecordError, Result};
use crate::types::{AccidentRecord, RawRow};
use crate::util::{
    parse_compound_category, parse_count, parse_localized_date, parse_multi_value_list,
    parse_optional_text,
};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
    pub malformed_categories: usize,
    pub invalid_dates: usize,
    pub invalid_counts: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: &LoadReport) {
        self.total_rows += other.total_rows;
        self.kept_rows += other.kept_rows;
        self.parse_errors += other.parse_errors;
        self.malformed_categories += other.malformed_categories;
        self.invalid_dates += other.invalid_dates;
        self.invalid_counts += other.invalid_counts;
    }

    pub fn skipped_rows(&self) -> usize {
        self.total_rows - self.kept_rows
    }
}

/// Map one raw row to a canonical record.
///
/// Category and date failures reject the row. An unparseable count does not:
/// the record keeps `people_amount = None` and the range filter drops it.
pub fn normalize(
    row: &RawRow,
    config: &NormalizeConfig,
) -> std::result::Result<AccidentRecord, RecordError> {
    let field = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();

    let category = parse_compound_category(&field(&row.industry))?;
    let date = parse_localized_date(&field(&row.occurrence_date))?;
    let people_amount = match parse_count(&field(&row.victim_count)) {
        Ok(n) => Some(n),
        Err(e) => {
            debug!("{}", e);
            None
        }
    };

    Ok(AccidentRecord {
        main_category: category.main,
        sub_category: category.sub,
        date,
        people_amount,
        company: parse_optional_text(&field(&row.company)),
        agency: parse_optional_text(&field(&row.agency)),
        boss: parse_optional_text(&field(&row.boss)),
        disaster_types: parse_multi_value_list(
            &field(&row.disaster_types),
            &config.multi_value_separator,
        ),
    })
}

/// Read and normalize a single yearly CSV file.
///
/// Failing to open or read the file is fatal; dirty rows are skipped and
/// counted.
pub fn load_source(
    path: &Path,
    config: &NormalizeConfig,
) -> Result<(Vec<AccidentRecord>, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::source_load(path, e))?;
    let (records, report) = read_records(file, config, &path.display().to_string())?;
    debug!(
        "{}: {} rows read, {} kept",
        path.display(),
        report.total_rows,
        report.kept_rows
    );
    Ok((records, report))
}

pub fn read_records<R: Read>(
    input: R,
    config: &NormalizeConfig,
    origin: &str,
) -> Result<(Vec<AccidentRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    rdr.headers().map_err(|e| DatasetError::source_load(origin, e))?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        // Header is line 1.
        let line = idx + 2;
        let row = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(DatasetError::source_load(origin, e)),
            Err(e) => {
                warn!("{}:{}: unreadable row: {}", origin, line, e);
                report.parse_errors += 1;
                continue;
            }
        };

        match normalize(&row, config) {
            Ok(record) => {
                if record.people_amount.is_none() {
                    report.invalid_counts += 1;
                }
                records.push(record);
            }
            Err(e) => {
                warn!("{}:{}: skipping row: {}", origin, line, e);
                match e {
                    RecordError::MalformedCategory { .. } => report.malformed_categories += 1,
                    RecordError::InvalidDate { .. } => report.invalid_dates += 1,
                    RecordError::InvalidCount { .. } => report.invalid_counts += 1,
                }
            }
        }
    }

    report.kept_rows = records.len();
    Ok((records, report))
}
