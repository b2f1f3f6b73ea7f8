//! Build entry point
//!
//! Runs the full pipeline for one record set: normalize, index, one triangle
//! per partition, one factor grid per triangle, output rows.
//!
//! # Example
//! ```ignore
//! let records = RecordSet::from_csv_path("claims.csv")?;
//! let request = TriangleRequest::new("accidentYear", "dev", "paid").with_category("lob");
//! let output = build(&records, &request)?;
//!
//! for (category, rows) in &output.triangles.0 {
//!     println!("{}: {} cohorts", category, rows.len());
//! }
//! ```

use crate::config::TriangleRequest;
use crate::error::Result;
use crate::records::{normalize, RecordSet};
use crate::triangle::{
    build_partitions, factor_rows, partitions, triangle_rows, AgeToAgeFactorGrid, Factor,
    KeyedRows, Triangle, TriangleIndex,
};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

/// Typed result of a build
#[derive(Debug, Clone)]
pub struct TriangleBuild {
    pub index: Arc<TriangleIndex>,
    /// One per partition, in partition order
    pub triangles: Vec<Triangle>,
    /// Parallel to `triangles`
    pub factor_grids: Vec<AgeToAgeFactorGrid>,
    pub coerced_values: usize,
    pub skipped_records: usize,
}

impl TriangleBuild {
    /// Flatten to output rows, naming the origin field `origin_field`
    pub fn to_output(&self, origin_field: &str) -> BuildOutput {
        BuildOutput {
            triangles: KeyedRows(
                self.triangles
                    .iter()
                    .map(|t| (t.category().clone(), triangle_rows(t, origin_field)))
                    .collect(),
            ),
            ldf_triangles: KeyedRows(
                self.factor_grids
                    .iter()
                    .map(|g| (g.category().clone(), factor_rows(g, origin_field)))
                    .collect(),
            ),
        }
    }

    pub fn triangle(&self, category: &str) -> Option<&Triangle> {
        self.triangles.iter().find(|t| t.category().as_str() == category)
    }

    pub fn factor_grid(&self, category: &str) -> Option<&AgeToAgeFactorGrid> {
        self.factor_grids.iter().find(|g| g.category().as_str() == category)
    }
}

/// Cumulative triangles and age-to-age factors per category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildOutput {
    pub triangles: KeyedRows<f64>,
    pub ldf_triangles: KeyedRows<Factor>,
}

/// Build typed triangles and factor grids
///
/// Fails only with a schema error, before anything is aggregated.
pub fn build_triangles(records: &RecordSet, request: &TriangleRequest) -> Result<TriangleBuild> {
    let normalized = normalize(records, request)?;

    let index = Arc::new(TriangleIndex::from_records(&normalized.records));
    let parts = partitions(normalized.categories.as_deref());
    let triangles = build_partitions(&normalized.records, &index, &parts, request.parallel);

    for triangle in &triangles {
        let violations = triangle.monotonicity_violations();
        if !violations.is_empty() {
            warn!(
                "Triangle '{}' has {} decreasing cumulative cell(s), first at origin {} age {}",
                triangle.category(),
                violations.len(),
                violations[0].0,
                violations[0].1
            );
        }
    }

    let factor_grids: Vec<AgeToAgeFactorGrid> =
        triangles.iter().map(AgeToAgeFactorGrid::from_triangle).collect();

    debug!(
        "Built {} triangle(s) over {} origins x {} ages from {} records",
        triangles.len(),
        index.origins().len(),
        index.ages().len(),
        normalized.records.len()
    );

    Ok(TriangleBuild {
        index,
        triangles,
        factor_grids,
        coerced_values: normalized.coerced_values,
        skipped_records: normalized.skipped_records,
    })
}

/// Build output rows for a record set and column selection
pub fn build(records: &RecordSet, request: &TriangleRequest) -> Result<BuildOutput> {
    Ok(build_triangles(records, request)?.to_output(&request.origin_col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Label;
    use approx::assert_relative_eq;

    fn csv(text: &str) -> RecordSet {
        RecordSet::from_csv_str(text).unwrap()
    }

    fn request() -> TriangleRequest {
        TriangleRequest::new("origin", "dev", "paid")
    }

    #[test]
    fn test_scenario_a_single_cohort() {
        let records = csv("origin,dev,paid\n2018,12,100\n2018,24,50\n");
        let output = build(&records, &request()).unwrap();

        let rows = output.triangles.get("Total").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].origin, "2018");
        assert_eq!(rows[0].field("12"), Some(&Some(100.0)));
        assert_eq!(rows[0].field("24"), Some(&Some(150.0)));
    }

    #[test]
    fn test_scenario_b_disjoint_categories_share_ages() {
        let records = csv(
            "origin,dev,paid,lob\n\
             2018,12,100,Auto\n2018,24,50,Auto\n\
             2019,12,70,Home\n2019,24,7,Home\n",
        );
        let built = build_triangles(&records, &request().with_category("lob")).unwrap();

        assert_eq!(built.triangles.len(), 2);
        let auto = built.triangle("Auto").unwrap();
        let home = built.triangle("Home").unwrap();
        assert!(Arc::ptr_eq(auto.index(), home.index()));

        let ages: Vec<_> = built.index.ages().iter().map(Label::key).collect();
        assert_eq!(ages, vec!["12", "24"]);
        assert_eq!(auto.cohorts(), vec![0]);
        assert_eq!(home.cohorts(), vec![1]);
        assert_relative_eq!(home.value(&Label::Integer(2019), &Label::Integer(24)).unwrap(), 77.0);

        let output = built.to_output("origin");
        let keys: Vec<_> = output.triangles.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Auto", "Home"]);
        // same age columns in every category
        assert_eq!(output.triangles.get("Auto").unwrap()[0].fields.len(), 2);
        assert_eq!(output.triangles.get("Home").unwrap()[0].fields.len(), 2);
    }

    #[test]
    fn test_category_with_only_skipped_rows_is_kept() {
        let records = csv("origin,dev,paid,lob\n2018,12,100,Auto\n,12,5,Home\n");
        let built = build_triangles(&records, &request().with_category("lob")).unwrap();
        assert_eq!(built.skipped_records, 1);
        assert!(built.triangle("Home").unwrap().is_empty());
        assert!(built.factor_grid("Home").unwrap().is_empty());

        let value = serde_json::to_value(built.to_output("origin")).unwrap();
        assert_eq!(value["triangles"]["Home"], serde_json::json!([]));
        assert_eq!(value["ldf_triangles"]["Home"], serde_json::json!([]));
        let keys: Vec<_> = value["triangles"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Auto", "Home"]);
    }

    #[test]
    fn test_scenario_c_zero_base_is_undefined() {
        let records = csv("origin,dev,paid\n2018,12,0\n2018,24,80\n");
        let output = build(&records, &request()).unwrap();
        let rows = output.ldf_triangles.get("Total").unwrap();
        assert_eq!(rows[0].field("12-24"), Some(&Some(Factor::Undefined)));
    }

    #[test]
    fn test_scenario_d_non_numeric_value_counts_as_zero() {
        let records = csv("origin,dev,paid\n2018,12,100\n2018,24,oops\n2018,36,10\n");
        let built = build_triangles(&records, &request()).unwrap();
        assert_eq!(built.coerced_values, 1);

        let tri = built.triangle("Total").unwrap();
        assert_relative_eq!(tri.get(0, 1).unwrap(), 100.0);
        assert_relative_eq!(tri.get(0, 2).unwrap(), 110.0);
    }

    #[test]
    fn test_schema_failure_each_column() {
        let records = csv("origin,dev,paid,lob\n2018,12,100,Auto\n");
        let base = request().with_category("lob");
        let cases = [
            ("origin", TriangleRequest { origin_col: "ay".into(), ..base.clone() }),
            ("dev", TriangleRequest { development_col: "age".into(), ..base.clone() }),
            ("paid", TriangleRequest { value_col: "incurred".into(), ..base.clone() }),
            ("lob", base.clone().with_category("portfolio")),
        ];
        for (replaced, req) in cases {
            let err = build(&records, &req).unwrap_err();
            let missing = err.missing_column().unwrap();
            assert!(!records.headers.iter().any(|h| h == missing), "{} not replaced", replaced);
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let records = csv(
            "origin,dev,paid,lob\n\
             2019,24,5,Home\n2018,12,100,Auto\n2019,12,3,Home\n2018,24,50,Auto\n2018,12,1,Home\n",
        );
        let req = request().with_category("lob");
        let first = build(&records, &req).unwrap();
        let second = build(&records, &req).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_factor_consistency_across_categories() {
        let records = csv(
            "origin,dev,paid,lob\n\
             2018,12,100,Auto\n2018,24,20,Auto\n2018,36,5,Auto\n\
             2019,12,40,Auto\n2019,24,0,Auto\n\
             2018,12,0,Home\n2018,36,9,Home\n",
        );
        let built = build_triangles(&records, &request().with_category("lob")).unwrap();

        for (tri, grid) in built.triangles.iter().zip(&built.factor_grids) {
            assert_eq!(tri.category(), grid.category());
            for origin in tri.cohorts() {
                let cells: Vec<_> = tri.cohort(origin).collect();
                for w in cells.windows(2) {
                    let factor = grid.get(origin, w[0].0, w[1].0).unwrap();
                    if w[0].1 == 0.0 {
                        assert!(factor.is_undefined());
                    } else {
                        assert_relative_eq!(factor.value().unwrap(), w[1].1 / w[0].1);
                    }
                }
            }
        }
        // Home 2018 spans 12-36 directly
        let home = built.factor_grid("Home").unwrap();
        assert!(home.get(0, 0, 2).unwrap().is_undefined());
    }

    #[test]
    fn test_index_consistency_across_categories() {
        let records = csv(
            "origin,dev,paid,lob\n2018,12,1,A\n2019,24,1,B\n2020,36,1,C\n",
        );
        let built = build_triangles(&records, &request().with_category("lob")).unwrap();
        for tri in &built.triangles {
            assert!(Arc::ptr_eq(tri.index(), &built.index));
            for ((o, a), _) in tri.cells() {
                assert!(o < built.index.origins().len());
                assert!(a < built.index.ages().len());
            }
        }
    }

    #[test]
    fn test_full_output_shape() {
        let records = csv("origin,dev,paid\n2018,12,100\n2018,24,50\n2019,12,80\n");
        let output = build(&records, &request()).unwrap();
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "triangles": {"Total": [
                    {"origin": "2018", "12": 100.0, "24": 150.0},
                    {"origin": "2019", "12": 80.0, "24": null}
                ]},
                "ldf_triangles": {"Total": [
                    {"origin": "2018", "12-24": 1.5},
                    {"origin": "2019", "12-24": null}
                ]}
            })
        );
    }
}
