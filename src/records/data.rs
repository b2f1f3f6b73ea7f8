//! Tabular record set handed to the engine by its host

use crate::error::{Result, TriangleError};
use serde_json::{Map, Value};

/// Raw rows as text cells under a header row
///
/// Rows shorter than the header read as blank in the missing positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    /// Column names in input order
    pub headers: Vec<String>,
    /// One entry per data row, one text cell per column
    pub rows: Vec<Vec<String>>,
}

impl RecordSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column, failing with a schema error if absent
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TriangleError::schema(name))
    }

    /// Cell text at (row, column), blank when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }

    /// Build from flat JSON objects
    ///
    /// Headers are the union of keys in first-seen order. Strings are taken
    /// as-is, numbers and booleans are rendered to text, `null` and nested
    /// values read as blank.
    pub fn from_json_records(records: &[Map<String, Value>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| match record.get(h) {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Number(n)) => n.to_string(),
                        Some(Value::Bool(b)) => b.to_string(),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Parse a JSON array of flat objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(json)?;
        Ok(Self::from_json_records(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_rows_read_blank() {
        let set = RecordSet::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()]],
        );
        assert_eq!(set.cell(0, 0), "1");
        assert_eq!(set.cell(0, 1), "");
        assert_eq!(set.cell(5, 0), "");
    }

    #[test]
    fn test_require_column() {
        let set = RecordSet::new(vec!["origin".into()], vec![]);
        assert_eq!(set.require_column("origin").unwrap(), 0);
        let err = set.require_column("dev").unwrap_err();
        assert_eq!(err.missing_column(), Some("dev"));
    }

    #[test]
    fn test_from_json_records() {
        let value = json!([
            {"origin": 2018, "dev": 12, "paid": "100"},
            {"origin": 2018, "dev": 24, "paid": null, "lob": "Auto"}
        ]);
        let records: Vec<Map<String, Value>> = serde_json::from_value(value).unwrap();
        let set = RecordSet::from_json_records(&records);

        assert_eq!(set.headers, vec!["origin", "dev", "paid", "lob"]);
        assert_eq!(set.rows[0], vec!["2018", "12", "100", ""]);
        assert_eq!(set.rows[1], vec!["2018", "24", "", "Auto"]);
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        assert!(RecordSet::from_json_str("{\"a\": 1}").is_err());
    }
}
