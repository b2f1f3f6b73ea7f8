//! Origin totals: `sum(value)` per origin label

use crate::error::Result;
use crate::labels::Label;
use crate::records::{coerce_value, column_labels, validate_columns, RecordSet};
use serde::Serialize;
use std::collections::HashMap;

/// Total value for one origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginTotal {
    pub origin: String,
    pub sum: f64,
}

/// Sum the value column per origin, ascending by origin
///
/// Uses the same schema check and value coercion as triangle builds. Rows
/// with a blank origin are grouped under an empty origin, listed last.
pub fn origin_totals(records: &RecordSet, origin_col: &str, value_col: &str) -> Result<Vec<OriginTotal>> {
    let columns = validate_columns(records, &[origin_col, value_col])?;
    let (origin_idx, value_idx) = (columns[0], columns[1]);

    let (_, origins) = column_labels(records, origin_idx, None);

    let mut order: Vec<Option<Label>> = Vec::new();
    let mut sums: HashMap<Option<Label>, f64> = HashMap::new();
    for (row, origin) in origins.into_iter().enumerate() {
        let (value, _) = coerce_value(records.cell(row, value_idx));
        if !sums.contains_key(&origin) {
            order.push(origin.clone());
        }
        *sums.entry(origin).or_insert(0.0) += value;
    }

    if order.iter().flatten().all(Label::is_orderable) {
        // None sorts first for Option; keep blanks at the end instead
        order.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    Ok(order
        .into_iter()
        .map(|origin| OriginTotal {
            sum: sums[&origin],
            origin: origin.map(|l| l.key()).unwrap_or_default(),
        })
        .collect())
}
