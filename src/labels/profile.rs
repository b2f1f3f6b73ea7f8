//! Column profiling
//!
//! Classifies the columns of a record set so a host can offer sensible
//! origin, development, value and category choices before building.

use super::grain::Grain;
use super::label::parse_date;
use crate::records::RecordSet;
use serde::Serialize;

/// Years accepted as date-like
const MIN_YEAR: i32 = 1950;
const MAX_YEAR: i32 = 2030;

/// Column names grouped by the kind of values they hold
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub date_like: Vec<String>,
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

fn in_year_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

fn is_bare_year(raw: &str) -> bool {
    raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit())
}

/// A value that reads as a year or date between 1950 and 2030
pub fn is_date_like(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }
    if let Ok(num) = raw.parse::<f64>() {
        return num.fract() == 0.0 && in_year_range(num as i32);
    }
    parse_date(raw).map(|d| in_year_range(chrono::Datelike::year(&d))).unwrap_or(false)
}

fn is_numeric(raw: &str) -> bool {
    raw.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Whether every non-blank value passes `check`, with at least one value
fn all_non_blank(set: &RecordSet, column: usize, check: fn(&str) -> bool) -> bool {
    let mut has_value = false;
    for raw in set.column(column) {
        if raw.trim().is_empty() {
            continue;
        }
        has_value = true;
        if !check(raw) {
            return false;
        }
    }
    has_value
}

/// Classify every header as date-like, numeric or categorical
///
/// Year columns are both date-like and numeric. Categorical means neither.
pub fn profile_columns(set: &RecordSet) -> ColumnProfile {
    let mut profile = ColumnProfile::default();
    if set.is_empty() {
        return profile;
    }

    for (idx, header) in set.headers.iter().enumerate() {
        let date_like = all_non_blank(set, idx, is_date_like);
        let numeric = all_non_blank(set, idx, is_numeric);
        if date_like {
            profile.date_like.push(header.clone());
        }
        if numeric {
            profile.numeric.push(header.clone());
        }
        if !date_like && !numeric {
            profile.categorical.push(header.clone());
        }
    }
    profile
}

/// Grains a date column supports
///
/// Bare years only aggregate yearly; any full date allows every grain. An
/// unknown or blank column name offers every grain.
pub fn aggregation_options(set: &RecordSet, column: &str) -> Vec<Grain> {
    let Some(idx) = set.column_index(column).filter(|_| !column.is_empty()) else {
        return Grain::ALL.to_vec();
    };

    let has_full_date = set.column(idx).any(|raw| {
        let raw = raw.trim();
        !raw.is_empty() && !is_bare_year(raw) && !is_numeric(raw) && parse_date(raw).is_some()
    });

    if has_full_date {
        Grain::ALL.to_vec()
    } else {
        vec![Grain::Yearly]
    }
}
