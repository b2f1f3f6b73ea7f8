//! Loss Triangles - development triangle and age-to-age factor engine
//!
//! This library provides:
//! - Record set adapters (CSV, flat JSON records) and value normalization
//! - Typed origin/development labels with optional calendar grain
//! - Cumulative loss triangles, optionally partitioned by category
//! - Age-to-age development factor grids
//! - Column profiling and origin totals for front-end helpers

pub mod error;
pub mod config;
pub mod labels;
pub mod records;
pub mod triangle;
pub mod engine;
pub mod summary;

// Re-export commonly used types
pub use error::{Result, TriangleError};
pub use config::TriangleRequest;
pub use labels::{Grain, Label, LabelKind};
pub use records::{RecordSet, Record};
pub use triangle::{AgeToAgeFactorGrid, CategoryKey, Factor, Triangle, TriangleIndex};
pub use engine::{build, build_triangles, BuildOutput, TriangleBuild};
pub use summary::{origin_totals, OriginTotal};
