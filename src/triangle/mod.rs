//! Triangle construction and age-to-age factors
//!
//! # Pipeline
//!
//! 1. [`TriangleIndex`]: ordered origins and ages, computed once per build
//! 2. [`partitions`]: `Total`, or one partition per category value
//! 3. [`Triangle::build`]: incremental sums per cell, cumulated per cohort
//! 4. [`AgeToAgeFactorGrid::from_triangle`]: ratios between consecutive
//!    present ages of each cohort
//! 5. [`triangle_rows`] / [`factor_rows`]: flat rows keyed by label strings
//!
//! All triangles of a build share one `Arc<TriangleIndex>`, so categories are
//! directly comparable cell by cell.

mod index;
mod builder;
mod partition;
mod factors;
mod output;

pub use index::TriangleIndex;
pub use builder::{CellKey, Triangle};
pub use partition::{build_partitions, partitions, CategoryKey, Partition, TOTAL_KEY};
pub use factors::{AgePair, AgeToAgeFactorGrid, Factor, UNDEFINED_MARKER};
pub use output::{factor_rows, triangle_rows, KeyedRows, OutputRow};
