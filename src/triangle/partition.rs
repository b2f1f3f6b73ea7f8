//! Category partitioner

use super::builder::Triangle;
use super::index::TriangleIndex;
use crate::labels::Label;
use crate::records::Record;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Label used when no category column is requested
pub const TOTAL_KEY: &str = "Total";

/// Output key of one partition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn total() -> Self {
        CategoryKey(TOTAL_KEY.to_string())
    }

    pub fn from_label(label: &Label) -> Self {
        CategoryKey(label.key())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which records a partition selects
#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    /// Every record
    Total,
    /// Records whose category equals this label
    Category(Label),
}

impl Partition {
    pub fn key(&self) -> CategoryKey {
        match self {
            Partition::Total => CategoryKey::total(),
            Partition::Category(label) => CategoryKey::from_label(label),
        }
    }

    pub fn selects(&self, record: &Record) -> bool {
        match self {
            Partition::Total => true,
            Partition::Category(label) => record.category.as_ref() == Some(label),
        }
    }
}

/// Partitions to build: `Total` alone, or one per category in the order given
///
/// A category whose rows were all skipped still gets a (empty) partition.
pub fn partitions(categories: Option<&[Label]>) -> Vec<Partition> {
    match categories {
        None => vec![Partition::Total],
        Some(labels) => labels.iter().cloned().map(Partition::Category).collect(),
    }
}

/// One triangle per partition, all on the same index, in partition order
pub fn build_partitions(
    records: &[Record],
    index: &Arc<TriangleIndex>,
    partitions: &[Partition],
    parallel: bool,
) -> Vec<Triangle> {
    let build = |p: &Partition| Triangle::build(records, index, p.key(), |r| p.selects(r));
    if parallel && partitions.len() > 1 {
        partitions.par_iter().map(build).collect()
    } else {
        partitions.iter().map(build).collect()
    }
}
