use crate::types::{AccidentRecord, AggregateRow, SummaryStats, YearRange};
use std::collections::HashMap;

/// One record's contribution to one disaster-type bucket.
#[derive(Debug, Clone, Copy)]
struct Attribution<'a> {
    record: &'a AccidentRecord,
    disaster_type: &'a str,
}

/// Sum values per key, emitting rows in key discovery order.
fn group_sum<'a, I>(entries: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut rows: Vec<AggregateRow> = Vec::new();
    for (key, amount) in entries {
        match index.get(key) {
            Some(&i) => rows[i].people_amount += amount,
            None => {
                index.insert(key, rows.len());
                rows.push(AggregateRow {
                    key: key.to_string(),
                    people_amount: amount,
                });
            }
        }
    }
    rows
}

fn amount(record: &AccidentRecord) -> u64 {
    u64::from(record.people_amount.unwrap_or(0))
}

pub fn aggregate_by_category(records: &[&AccidentRecord]) -> Vec<AggregateRow> {
    group_sum(records.iter().map(|r| (r.main_category.as_str(), amount(r))))
}

fn expand_disaster_types<'a>(records: &[&'a AccidentRecord]) -> Vec<Attribution<'a>> {
    let mut out = Vec::new();
    for &record in records {
        let mut seen: Vec<&str> = Vec::with_capacity(record.disaster_types.len());
        for t in &record.disaster_types {
            if seen.contains(&t.as_str()) {
                continue;
            }
            seen.push(t);
            out.push(Attribution {
                record,
                disaster_type: t,
            });
        }
    }
    out
}

/// Every distinct disaster type on a record receives the record's full
/// victim count; a type repeated within one record counts once.
pub fn aggregate_by_disaster_type(records: &[&AccidentRecord]) -> Vec<AggregateRow> {
    group_sum(
        expand_disaster_types(records)
            .into_iter()
            .map(|a| (a.disaster_type, amount(a.record))),
    )
}

/// Stable sort, largest first; ties keep discovery order.
pub fn rank_descending(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| b.people_amount.cmp(&a.people_amount));
}

pub fn generate_summary(
    range: YearRange,
    records: &[&AccidentRecord],
    by_category: &[AggregateRow],
    by_disaster_type: &[AggregateRow],
) -> SummaryStats {
    SummaryStats {
        start_year: range.start(),
        end_year: range.end(),
        total_records: records.len(),
        total_people: records.iter().map(|r| amount(r)).sum(),
        total_categories: by_category.len(),
        total_disaster_types: by_disaster_type.len(),
    }
}
