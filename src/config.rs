//! Build request: column selection and options

use crate::labels::Grain;
use serde::{Deserialize, Serialize};

fn default_origin_col() -> String { "origin".to_string() }
fn default_development_col() -> String { "development".to_string() }
fn default_value_col() -> String { "value".to_string() }
fn default_parallel() -> bool { true }

/// Which columns hold the triangle coordinates and how to read them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleRequest {
    /// Origin cohort column (e.g., accident year)
    #[serde(default = "default_origin_col")]
    pub origin_col: String,

    /// Development age or valuation period column
    #[serde(default = "default_development_col")]
    pub development_col: String,

    /// Numeric amount column
    #[serde(default = "default_value_col")]
    pub value_col: String,

    /// Optional partition column; one triangle per distinct value
    #[serde(default)]
    pub category_col: Option<String>,

    /// Grain applied when the origin column is date-like
    #[serde(default)]
    pub origin_grain: Option<Grain>,

    /// Grain applied when the development column is date-like
    #[serde(default)]
    pub development_grain: Option<Grain>,

    /// Build category partitions on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl TriangleRequest {
    pub fn new(
        origin_col: impl Into<String>,
        development_col: impl Into<String>,
        value_col: impl Into<String>,
    ) -> Self {
        Self {
            origin_col: origin_col.into(),
            development_col: development_col.into(),
            value_col: value_col.into(),
            category_col: None,
            origin_grain: None,
            development_grain: None,
            parallel: default_parallel(),
        }
    }

    pub fn with_category(mut self, category_col: impl Into<String>) -> Self {
        self.category_col = Some(category_col.into());
        self
    }

    pub fn with_origin_grain(mut self, grain: Grain) -> Self {
        self.origin_grain = Some(grain);
        self
    }

    pub fn with_development_grain(mut self, grain: Grain) -> Self {
        self.development_grain = Some(grain);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Category column, treating a blank name as "no category"
    pub fn category(&self) -> Option<&str> {
        self.category_col
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Columns that must exist in the input, in validation order
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![
            self.origin_col.as_str(),
            self.development_col.as_str(),
            self.value_col.as_str(),
        ];
        if let Some(category) = self.category() {
            cols.push(category);
        }
        cols
    }
}

impl Default for TriangleRequest {
    fn default() -> Self {
        Self::new(default_origin_col(), default_development_col(), default_value_col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_json() {
        let request: TriangleRequest =
            serde_json::from_str(r#"{"origin_col": "accidentYear", "value_col": "paid"}"#).unwrap();
        assert_eq!(request.origin_col, "accidentYear");
        assert_eq!(request.development_col, "development");
        assert_eq!(request.value_col, "paid");
        assert!(request.category_col.is_none());
        assert!(request.parallel);
    }

    #[test]
    fn test_blank_category_is_none() {
        let request = TriangleRequest::default().with_category("  ");
        assert_eq!(request.category(), None);
        assert_eq!(request.required_columns().len(), 3);

        let request = TriangleRequest::default().with_category("lob");
        assert_eq!(request.required_columns(), vec!["origin", "development", "value", "lob"]);
    }

    #[test]
    fn test_grain_from_json() {
        let request: TriangleRequest =
            serde_json::from_str(r#"{"origin_grain": "quarterly"}"#).unwrap();
        assert_eq!(request.origin_grain, Some(Grain::Quarterly));
    }
}
