//! Occupational-accident victim rankings.
//!
//! Yearly CSV exports are normalized into [`types::AccidentRecord`]s, filtered
//! by year range and ranked by industry and by disaster type.

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use dataset::Dataset;
pub use error::{DatasetError, OutputError, RecordError, Result};
