// Field parsers for the raw accident CSV columns, plus display helpers.
//
// Everything that has to cope with the dirty textual encodings lives here so
// the normalizer can compose typed values field by field.
use crate::error::RecordError;
use crate::types::{CategoryFormat, CompoundCategory};
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Offset between the local (Minguo) calendar year and the Gregorian year.
pub const CALENDAR_YEAR_OFFSET: i32 = 1911;

/// Default separator between values of a multi-valued column.
pub const DEFAULT_MULTI_VALUE_SEPARATOR: &str = "、";

const EMPTY_SENTINEL: &str = "-";

/// `"-"` and `""` both mean "no value" in the published files.
pub fn parse_optional_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || s == EMPTY_SENTINEL {
        return None;
    }
    Some(s.to_string())
}

/// Parse `YYY/MM/DD` in the offset calendar into a Gregorian date.
///
/// `"107/03/05"` becomes 2018-03-05. Anything that is not three slash
/// separated integers forming a real calendar date is an error.
pub fn parse_localized_date(s: &str) -> Result<NaiveDate, RecordError> {
    let invalid = || RecordError::InvalidDate {
        value: s.to_string(),
    };
    let mut parts = s.trim().split('/');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !(all_digits(y) && all_digits(m) && all_digits(d)) {
        return Err(invalid());
    }
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    let day: u32 = d.parse().map_err(|_| invalid())?;
    let year = year.checked_add(CALENDAR_YEAR_OFFSET).ok_or_else(invalid)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Split an industry classification into main and sub category.
///
/// The presence of `'('` selects the parenthesized format; otherwise the
/// value must be in the coded format and contain a `'-'`.
pub fn parse_compound_category(s: &str) -> Result<CompoundCategory, RecordError> {
    let s = s.trim();
    if let Some(open) = s.find('(') {
        let main = s[..open].trim().to_string();
        let rest = &s[open + 1..];
        let sub = rest.split(')').next().unwrap_or(rest);
        return Ok(CompoundCategory {
            format: CategoryFormat::Parenthesized,
            main,
            sub: non_empty(sub),
        });
    }

    let Some(dash) = s.find('-') else {
        return Err(RecordError::MalformedCategory {
            value: s.to_string(),
        });
    };
    // Drop the leading letter code. The dash is ASCII, so if it is the very
    // first character there is no code and no main category.
    let head = &s[..dash];
    let main = head
        .char_indices()
        .nth(1)
        .map(|(i, _)| &head[i..])
        .unwrap_or("");
    Ok(CompoundCategory {
        format: CategoryFormat::Coded,
        main: main.trim().to_string(),
        sub: non_empty(&s[dash + 1..]),
    })
}

/// Split a multi-valued field, preserving order. Empty segments are dropped,
/// so an empty input yields an empty list.
pub fn parse_multi_value_list(s: &str, separator: &str) -> Vec<String> {
    s.split(separator)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a victim count. Accepts thousands separators and integral decimals
/// like `"3.0"`; rejects empty, negative, fractional and non-numeric text.
pub fn parse_count(s: &str) -> Result<u32, RecordError> {
    let invalid = || RecordError::InvalidCount {
        value: s.to_string(),
    };
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err(invalid());
    }
    if let Ok(n) = cleaned.parse::<u32>() {
        return Ok(n);
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Ok(f as u32)
        }
        _ => Err(invalid()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_sentinels() {
        assert_eq!(parse_optional_text("-"), None);
        assert_eq!(parse_optional_text(""), None);
        assert_eq!(parse_optional_text("  "), None);
        assert_eq!(parse_optional_text("台灣公司"), Some("台灣公司".to_string()));
    }

    #[test]
    fn localized_date_adds_offset() {
        let d = parse_localized_date("107/03/05").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2018, 3, 5).unwrap());
        let d = parse_localized_date("110/12/31").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[test]
    fn localized_date_rejects_garbage() {
        for bad in [
            "",
            "107-03-05",
            "107/03",
            "107/03/05/01",
            "abc/01/02",
            "107/13/01",
            "107/02/30",
            "2147483000/01/01",
            "99999999999/01/01",
        ] {
            assert_eq!(
                parse_localized_date(bad),
                Err(RecordError::InvalidDate {
                    value: bad.to_string()
                }),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn coded_category() {
        let c = parse_compound_category("A製造業-0100食品").unwrap();
        assert_eq!(c.format, CategoryFormat::Coded);
        assert_eq!(c.main, "製造業");
        assert_eq!(c.sub.as_deref(), Some("0100食品"));
    }

    #[test]
    fn coded_category_keeps_everything_after_first_dash() {
        let c = parse_compound_category("F營造業-4100建築-工程").unwrap();
        assert_eq!(c.main, "營造業");
        assert_eq!(c.sub.as_deref(), Some("4100建築-工程"));
    }

    #[test]
    fn parenthesized_category() {
        let c = parse_compound_category("營造業(土木工程)").unwrap();
        assert_eq!(c.format, CategoryFormat::Parenthesized);
        assert_eq!(c.main, "營造業");
        assert_eq!(c.sub.as_deref(), Some("土木工程"));
    }

    #[test]
    fn main_category_is_trimmed_in_both_formats() {
        let c = parse_compound_category("營造業 (土木工程)").unwrap();
        assert_eq!(c.main, "營造業");
        assert_eq!(c.sub.as_deref(), Some("土木工程"));
        let c = parse_compound_category("A製造業 -0100食品").unwrap();
        assert_eq!(c.main, "製造業");
    }

    #[test]
    fn parenthesized_takes_precedence_over_dash() {
        let c = parse_compound_category("批發-零售業(其他)").unwrap();
        assert_eq!(c.format, CategoryFormat::Parenthesized);
        assert_eq!(c.main, "批發-零售業");
    }

    #[test]
    fn category_without_delimiter_is_malformed() {
        assert_eq!(
            parse_compound_category("製造業"),
            Err(RecordError::MalformedCategory {
                value: "製造業".to_string()
            })
        );
    }

    #[test]
    fn coded_category_without_code_has_empty_main() {
        let c = parse_compound_category("-0100食品").unwrap();
        assert_eq!(c.main, "");
    }

    #[test]
    fn multi_value_list() {
        assert_eq!(
            parse_multi_value_list("墜落、感電", DEFAULT_MULTI_VALUE_SEPARATOR),
            vec!["墜落", "感電"]
        );
        assert_eq!(parse_multi_value_list("墜落", DEFAULT_MULTI_VALUE_SEPARATOR), vec!["墜落"]);
        assert!(parse_multi_value_list("", DEFAULT_MULTI_VALUE_SEPARATOR).is_empty());
        assert_eq!(parse_multi_value_list("墜落;感電", ";"), vec!["墜落", "感電"]);
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("3"), Ok(3));
        assert_eq!(parse_count(" 12 "), Ok(12));
        assert_eq!(parse_count("1,024"), Ok(1024));
        assert_eq!(parse_count("2.0"), Ok(2));
        assert_eq!(parse_count("0"), Ok(0));
        for bad in ["", "abc", "-1", "1.5", "NaN"] {
            assert!(parse_count(bad).is_err(), "input {bad:?}");
        }
    }
}
