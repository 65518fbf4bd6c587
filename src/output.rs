use crate::error::OutputError;
use crate::types::{AggregateRow, BarRow, ChartTables};
use crate::util::format_int;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table};

pub const CATEGORY_CHART_TITLE: &str = "各行業罹災人數";
pub const DISASTER_TYPE_CHART_TITLE: &str = "各災害類型罹災人數";

const BAR_WIDTH: usize = 40;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Scale rows onto a `[0, max]` horizontal bar axis.
pub fn bar_rows(rows: &[AggregateRow], max_rows: Option<usize>) -> Vec<BarRow> {
    let max = rows.iter().map(|r| r.people_amount).max().unwrap_or(0);
    rows.iter()
        .take(max_rows.unwrap_or(rows.len()))
        .enumerate()
        .map(|(idx, r)| {
            let len = if max == 0 {
                0
            } else {
                ((r.people_amount as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
            };
            BarRow {
                rank: idx + 1,
                key: r.key.clone(),
                people: format_int(r.people_amount),
                bar: "█".repeat(len),
            }
        })
        .collect()
}

pub fn render_chart(
    title: &str,
    subtitle: &str,
    rows: &[AggregateRow],
    max_rows: Option<usize>,
) -> String {
    let mut out = format!("{}\n{}\n\n", title, subtitle);
    let bars = bar_rows(rows, max_rows);
    if bars.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    out.push_str(&Table::new(bars).with(Style::markdown()).to_string());
    out.push('\n');
    out
}

pub fn print_charts(tables: &ChartTables, max_rows: Option<usize>) {
    let subtitle = tables.range.label();
    println!(
        "{}",
        render_chart(CATEGORY_CHART_TITLE, &subtitle, &tables.by_category, max_rows)
    );
    println!(
        "{}",
        render_chart(
            DISASTER_TYPE_CHART_TITLE,
            &subtitle,
            &tables.by_disaster_type,
            max_rows
        )
    );
    println!(
        "Records: {}  Victims: {}\n",
        format_int(tables.summary.total_records),
        format_int(tables.summary.total_people)
    );
}

/// Write both tables and the summary into `dir`, file names keyed by range.
pub fn export(dir: &Path, tables: &ChartTables) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;
    let suffix = format!("{}_{}", tables.range.start(), tables.range.end());
    let category = dir.join(format!("people_by_category_{}.csv", suffix));
    let disaster = dir.join(format!("people_by_disaster_type_{}.csv", suffix));
    let summary = dir.join(format!("summary_{}.json", suffix));
    write_csv(&category, &tables.by_category)?;
    write_csv(&disaster, &tables.by_disaster_type)?;
    write_json(&summary, &tables.summary)?;
    Ok(vec![category, disaster, summary])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SummaryStats, YearRange};

    fn row(key: &str, people_amount: u64) -> AggregateRow {
        AggregateRow {
            key: key.to_string(),
            people_amount,
        }
    }

    fn tables() -> ChartTables {
        ChartTables {
            range: YearRange::new(2018, 2019).unwrap(),
            by_category: vec![row("營造業", 5), row("製造業", 3)],
            by_disaster_type: vec![row("墜落", 8), row("感電", 5)],
            summary: SummaryStats {
                start_year: 2018,
                end_year: 2019,
                total_records: 2,
                total_people: 8,
                total_categories: 2,
                total_disaster_types: 2,
            },
        }
    }

    #[test]
    fn bars_scale_to_max() {
        let bars = bar_rows(&[row("a", 10), row("b", 5), row("c", 0)], None);
        assert_eq!(bars[0].bar.chars().count(), BAR_WIDTH);
        assert_eq!(bars[1].bar.chars().count(), BAR_WIDTH / 2);
        assert_eq!(bars[2].bar, "");
        assert_eq!(bars[2].rank, 3);
    }

    #[test]
    fn max_rows_truncates_but_keeps_scale() {
        let bars = bar_rows(&[row("a", 1_000), row("b", 500)], Some(1));
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].people, "1,000");
    }

    #[test]
    fn chart_text_has_title_and_range() {
        let t = tables();
        let text = render_chart(CATEGORY_CHART_TITLE, &t.range.label(), &t.by_category, None);
        assert!(text.starts_with("各行業罹災人數\n年份: 2018~2019\n"));
        assert!(text.contains("營造業"));
        let empty = render_chart(DISASTER_TYPE_CHART_TITLE, "年份: 2018", &[], None);
        assert!(empty.contains("(no rows)"));
    }

    #[test]
    fn export_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export(dir.path(), &tables()).unwrap();
        assert_eq!(paths.len(), 3);
        let csv = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(csv, "key,people_amount\n營造業,5\n製造業,3\n");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths[2]).unwrap()).unwrap();
        assert_eq!(json["total_people"], 8);
    }

    #[test]
    fn export_into_a_file_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let err = export(&blocker, &tables()).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }
}
