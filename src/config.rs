use crate::util::DEFAULT_MULTI_VALUE_SEPARATOR;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "accident_report",
    about = "Rank occupational-accident victims by industry and disaster type",
    version,
    long_about = None
)]
pub struct Args {
    /// Directory holding the yearly CSV files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Source files inside the data directory, loaded in this order
    #[arg(long, num_args = 1.., default_values_t = default_files())]
    pub files: Vec<String>,

    /// First Gregorian year to include (defaults to the earliest in the data)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last Gregorian year to include (defaults to the latest in the data)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Separator between disaster types in one field
    #[arg(long, default_value = DEFAULT_MULTI_VALUE_SEPARATOR, value_parser = parse_separator)]
    pub separator: String,

    /// Write both tables and a JSON summary into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Number of rows to show per chart on the console
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Keep prompting for new year ranges after the first render
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_separator(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("separator must not be empty".to_string());
    }
    Ok(s.to_string())
}

fn default_files() -> Vec<String> {
    ["107.csv", "108.csv", "109.csv", "110.csv"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Args {
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| self.data_dir.join(f)).collect()
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            multi_value_separator: self.separator.clone(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Knobs the record normalizer honours.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub multi_value_separator: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            multi_value_separator: DEFAULT_MULTI_VALUE_SEPARATOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_four_yearly_files() {
        let args = Args::parse_from(["accident_report"]);
        let paths = args.source_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], PathBuf::from("data").join("107.csv"));
        assert_eq!(paths[3], PathBuf::from("data").join("110.csv"));
        assert_eq!(args.normalize_config().multi_value_separator, "、");
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn explicit_files_and_range() {
        let args = Args::parse_from([
            "accident_report",
            "--data-dir",
            "/tmp/x",
            "--files",
            "a.csv",
            "b.csv",
            "--start-year",
            "2019",
            "--end-year",
            "2020",
            "-v",
        ]);
        assert_eq!(
            args.source_paths(),
            vec![PathBuf::from("/tmp/x/a.csv"), PathBuf::from("/tmp/x/b.csv")]
        );
        assert_eq!(args.start_year, Some(2019));
        assert_eq!(args.end_year, Some(2020));
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn empty_separator_is_rejected() {
        let err = Args::try_parse_from(["accident_report", "--separator", ""]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let args = Args::try_parse_from(["accident_report", "--separator", ";"]).unwrap();
        assert_eq!(args.normalize_config().multi_value_separator, ";");
    }
}
