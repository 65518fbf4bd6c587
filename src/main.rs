// Entry point and high-level CLI flow.
//
// - All yearly CSV files are loaded once, concurrently.
// - The initial year range is charted straight away.
// - With `--interactive`, new ranges are read from stdin one at a time and
//   each one is recomputed from the full dataset.
use accident_report::config::Args;
use accident_report::output;
use accident_report::types::ChartTables;
use accident_report::util::format_int;
use accident_report::{Dataset, DatasetError};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{error, info, warn};

const INVALID_RANGE_MESSAGE: &str = "起始年份不可大於結束年份";

fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("accident_report={}", args.log_level())));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Read one line after printing `prompt`. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Parse `"<start> <end>"` (space, comma or `~` separated).
fn parse_range_input(input: &str) -> Option<(i32, i32)> {
    let mut parts = input
        .split(|c: char| c.is_whitespace() || c == ',' || c == '~')
        .filter(|p| !p.is_empty());
    let start = parts.next()?.parse().ok()?;
    let end = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((start, end))
}

fn present(tables: &ChartTables, args: &Args) {
    output::print_charts(tables, args.top);
    if let Some(dir) = &args.export_dir {
        match output::export(dir, tables) {
            Ok(paths) => {
                for p in paths {
                    info!("exported {}", p.display());
                }
            }
            Err(e) => error!("export to {} failed: {}", dir.display(), e),
        }
    }
}

/// Render one request. An inverted range is reported and nothing is drawn.
fn handle_render(dataset: &Dataset, start: i32, end: i32, args: &Args) {
    match dataset.render(start, end) {
        Ok(tables) => present(&tables, args),
        Err(DatasetError::InvalidRange { start, end }) => {
            warn!("rejected range {}..{}", start, end);
            println!("{}\n", INVALID_RANGE_MESSAGE);
        }
        Err(e) => error!("render failed: {}", e),
    }
}

fn interactive_loop(dataset: &Dataset, args: &Args) {
    loop {
        let Some(line) = read_line("Year range (start end), empty to exit: ") else {
            break;
        };
        if line.is_empty() {
            break;
        }
        match parse_range_input(&line) {
            Some((start, end)) => handle_render(dataset, start, end, args),
            None => println!("Invalid input. Please enter two years, e.g. 2018 2021.\n"),
        }
    }
    println!("Exiting the program.");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    let sources = args.source_paths();
    let (dataset, report) = Dataset::load(&sources, &args.normalize_config())
        .await
        .context("loading accident data")?;
    info!(
        "dataset ready: {} rows read, {} records kept, {} skipped \
         ({} unreadable, {} bad category, {} bad date), {} without a valid count",
        format_int(report.total_rows),
        format_int(report.kept_rows),
        format_int(report.skipped_rows()),
        report.parse_errors,
        report.malformed_categories,
        report.invalid_dates,
        report.invalid_counts
    );

    let span = dataset.year_span();
    let start = args.start_year.or(span.map(|s| s.start()));
    let end = args.end_year.or(span.map(|s| s.end()));
    match (start, end) {
        (Some(start), Some(end)) => handle_render(&dataset, start, end, &args),
        _ => warn!("no records loaded and no year range given; nothing to chart"),
    }

    if args.interactive {
        interactive_loop(&dataset, &args);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_input_forms() {
        assert_eq!(parse_range_input("2018 2021"), Some((2018, 2021)));
        assert_eq!(parse_range_input("2018,2021"), Some((2018, 2021)));
        assert_eq!(parse_range_input("2018~2021"), Some((2018, 2021)));
        assert_eq!(parse_range_input("110 107"), Some((110, 107)));
        assert_eq!(parse_range_input("2018"), None);
        assert_eq!(parse_range_input("a b"), None);
        assert_eq!(parse_range_input("1 2 3"), None);
    }
}
