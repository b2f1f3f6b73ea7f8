//! Record normalizer
//!
//! Validates the requested columns, coerces the value column to numbers and
//! turns coordinate cells into typed labels. Unparseable values count as zero
//! rather than failing the build.

use super::RecordSet;
use crate::config::TriangleRequest;
use crate::error::Result;
use crate::labels::{Grain, Label, LabelKind};
use log::{debug, warn};
use std::collections::HashSet;

/// One input row after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub origin: Label,
    pub development: Label,
    pub value: f64,
    /// Partition label, `None` when no category column was requested
    pub category: Option<Label>,
}

/// Normalized rows plus what happened to the raw input
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecords {
    pub records: Vec<Record>,
    /// Value cells that failed numeric parsing and were replaced with zero
    pub coerced_values: usize,
    /// Rows dropped because the origin or development cell was blank
    pub skipped_records: usize,
    /// Distinct categories in first-seen order over every input row, skipped
    /// rows included; `None` when no category column was requested
    pub categories: Option<Vec<Label>>,
}

/// Parse a value cell; unparseable, blank or non-finite cells read as zero
///
/// Returns the value and whether it was coerced.
pub fn coerce_value(raw: &str) -> (f64, bool) {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => (v, false),
        _ => (0.0, true),
    }
}

/// Fail with a schema error naming the first missing column
pub fn validate_columns(set: &RecordSet, columns: &[&str]) -> Result<Vec<usize>> {
    columns.iter().map(|c| set.require_column(c)).collect()
}

/// Parse one column into labels, inferring its kind once
pub(crate) fn column_labels(
    set: &RecordSet,
    column: usize,
    grain: Option<Grain>,
) -> (LabelKind, Vec<Option<Label>>) {
    let kind = LabelKind::infer(set.column(column));
    if grain.is_some() && kind != LabelKind::Date {
        debug!("Grain ignored for non-date column '{}' ({:?})", set.headers[column], kind);
    }
    let labels = set
        .column(column)
        .map(|raw| {
            let label = kind.parse(raw)?;
            Some(match grain {
                Some(g) => g.apply(label),
                None => label,
            })
        })
        .collect();
    (kind, labels)
}

fn distinct_categories(labels: &[Label]) -> Vec<Label> {
    let mut seen = HashSet::new();
    labels.iter().filter(|l| seen.insert(*l)).cloned().collect()
}

/// Normalize a record set for the requested columns
pub fn normalize(set: &RecordSet, request: &TriangleRequest) -> Result<NormalizedRecords> {
    let columns = validate_columns(set, &request.required_columns())?;
    let (origin_idx, development_idx, value_idx) = (columns[0], columns[1], columns[2]);
    let category_idx = columns.get(3).copied();

    let (_, origins) = column_labels(set, origin_idx, request.origin_grain);
    let (_, developments) = column_labels(set, development_idx, request.development_grain);
    let categories = category_idx.map(|idx| {
        let kind = LabelKind::infer(set.column(idx));
        set.column(idx)
            .map(|raw| kind.parse(raw).unwrap_or_else(|| Label::Text(String::new())))
            .collect::<Vec<_>>()
    });

    let mut normalized = NormalizedRecords {
        records: Vec::with_capacity(set.len()),
        categories: categories.as_deref().map(distinct_categories),
        ..Default::default()
    };

    for (row, (origin, development)) in origins.into_iter().zip(developments).enumerate() {
        let (value, coerced) = coerce_value(set.cell(row, value_idx));
        if coerced {
            normalized.coerced_values += 1;
        }

        let (Some(origin), Some(development)) = (origin, development) else {
            normalized.skipped_records += 1;
            continue;
        };

        normalized.records.push(Record {
            origin,
            development,
            value,
            category: categories.as_ref().map(|c| c[row].clone()),
        });
    }

    if normalized.coerced_values > 0 {
        debug!(
            "{} value cell(s) in '{}' were not numeric and count as 0",
            normalized.coerced_values, request.value_col
        );
    }
    if normalized.skipped_records > 0 {
        warn!(
            "Skipped {} row(s) with blank '{}' or '{}'",
            normalized.skipped_records, request.origin_col, request.development_col
        );
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordSet {
        RecordSet::from_csv_str(
            "origin,dev,paid,lob\n2018,12,100,Auto\n2018,24,abc,Auto\n,36,5,Home\n2019,12,,Home\n",
        )
        .unwrap()
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("12.5"), (12.5, false));
        assert_eq!(coerce_value(" -3 "), (-3.0, false));
        assert_eq!(coerce_value("n/a"), (0.0, true));
        assert_eq!(coerce_value(""), (0.0, true));
        assert_eq!(coerce_value("NaN"), (0.0, true));
        assert_eq!(coerce_value("inf"), (0.0, true));
        assert_eq!(coerce_value("-infinity"), (0.0, true));
    }

    #[test]
    fn test_schema_error_for_each_column() {
        let set = sample();
        let base = TriangleRequest::new("origin", "dev", "paid").with_category("lob");
        assert!(normalize(&set, &base).is_ok());

        let cases = [
            TriangleRequest { origin_col: "missing".into(), ..base.clone() },
            TriangleRequest { development_col: "missing".into(), ..base.clone() },
            TriangleRequest { value_col: "missing".into(), ..base.clone() },
            base.clone().with_category("missing"),
        ];
        for request in cases {
            let err = normalize(&set, &request).unwrap_err();
            assert_eq!(err.missing_column(), Some("missing"));
        }
    }

    #[test]
    fn test_coercion_and_skips() {
        let set = sample();
        let request = TriangleRequest::new("origin", "dev", "paid").with_category("lob");
        let normalized = normalize(&set, &request).unwrap();

        // "abc" and the blank value both coerce
        assert_eq!(normalized.coerced_values, 2);
        // blank origin row cannot be placed
        assert_eq!(normalized.skipped_records, 1);
        assert_eq!(normalized.records.len(), 3);
        assert_eq!(normalized.records[1].value, 0.0);
        assert_eq!(normalized.records[0].origin, Label::Integer(2018));
        assert_eq!(normalized.records[0].category, Some(Label::Text("Auto".into())));
    }

    #[test]
    fn test_no_category_column() {
        let request = TriangleRequest::new("origin", "dev", "paid");
        let normalized = normalize(&sample(), &request).unwrap();
        assert_eq!(normalized.categories, None);
        assert!(normalized.records.iter().all(|r| r.category.is_none()));
    }

    #[test]
    fn test_categories_include_skipped_rows() {
        let request = TriangleRequest::new("origin", "dev", "paid").with_category("lob");
        let normalized = normalize(&sample(), &request).unwrap();
        // Home first appears on the row with a blank origin
        assert_eq!(
            normalized.categories,
            Some(vec![Label::Text("Auto".into()), Label::Text("Home".into())])
        );
    }

    #[test]
    fn test_origin_grain_applied() {
        let set = RecordSet::from_csv_str(
            "accident_date,dev,paid\n2020-01-15,12,1\n2020-02-20,12,2\n2020-05-01,12,3\n",
        )
        .unwrap();
        let request = TriangleRequest::new("accident_date", "dev", "paid")
            .with_origin_grain(Grain::Quarterly);
        let normalized = normalize(&set, &request).unwrap();
        let keys: Vec<_> = normalized.records.iter().map(|r| r.origin.key()).collect();
        assert_eq!(keys, vec!["2020Q1", "2020Q1", "2020Q2"]);
    }
}
