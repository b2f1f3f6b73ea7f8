//! Triangle builder
//!
//! Sums record values per (origin, age) cell, then accumulates each cohort
//! along its own observed ages. Cells with no records stay absent.

use super::index::TriangleIndex;
use super::partition::CategoryKey;
use crate::labels::Label;
use crate::records::Record;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Cell coordinate: (origin position, age position) in the shared index
pub type CellKey = (usize, usize);

/// Cumulative cohort × age grid for one category
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    category: CategoryKey,
    index: Arc<TriangleIndex>,
    /// Sparse cumulative cells, ordered by origin then age
    cells: BTreeMap<CellKey, f64>,
}

/// Sum values per cell for the records `filter` selects
fn incremental_sums<F>(records: &[Record], index: &TriangleIndex, filter: F) -> BTreeMap<CellKey, f64>
where
    F: Fn(&Record) -> bool,
{
    let mut sums = BTreeMap::new();
    for record in records.iter().filter(|r| filter(r)) {
        let (Some(o), Some(a)) = (
            index.origin_position(&record.origin),
            index.age_position(&record.development),
        ) else {
            continue;
        };
        *sums.entry((o, a)).or_insert(0.0) += record.value;
    }
    sums
}

/// Running total per cohort over its present ages, in index order
fn cumulate(incremental: BTreeMap<CellKey, f64>) -> BTreeMap<CellKey, f64> {
    let mut cumulative = BTreeMap::new();
    let mut current_origin = None;
    let mut running = 0.0;

    for ((origin, age), value) in incremental {
        if current_origin != Some(origin) {
            current_origin = Some(origin);
            running = 0.0;
        }
        running += value;
        cumulative.insert((origin, age), running);
    }
    cumulative
}

impl Triangle {
    /// Build the triangle for the records `filter` selects
    pub fn build<F>(records: &[Record], index: &Arc<TriangleIndex>, category: CategoryKey, filter: F) -> Self
    where
        F: Fn(&Record) -> bool,
    {
        let incremental = incremental_sums(records, index, filter);
        Self {
            category,
            index: Arc::clone(index),
            cells: cumulate(incremental),
        }
    }

    pub fn category(&self) -> &CategoryKey {
        &self.category
    }

    pub fn index(&self) -> &Arc<TriangleIndex> {
        &self.index
    }

    /// Cumulative value at (origin position, age position)
    pub fn get(&self, origin: usize, age: usize) -> Option<f64> {
        self.cells.get(&(origin, age)).copied()
    }

    /// Cumulative value by label
    pub fn value(&self, origin: &Label, age: &Label) -> Option<f64> {
        let o = self.index.origin_position(origin)?;
        let a = self.index.age_position(age)?;
        self.get(o, a)
    }

    /// Present (age position, cumulative value) pairs of one cohort, ascending
    pub fn cohort(&self, origin: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cells
            .range((origin, 0)..(origin + 1, 0))
            .map(|(&(_, age), &v)| (age, v))
    }

    /// Origin positions with at least one observed cell, ascending
    pub fn cohorts(&self) -> Vec<usize> {
        let mut cohorts: Vec<usize> = self.cells.keys().map(|&(o, _)| o).collect();
        cohorts.dedup();
        cohorts
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellKey, f64)> + '_ {
        self.cells.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells whose cumulative value is below an earlier age of the same cohort
    ///
    /// Negative incremental amounts produce these; they are reported, never
    /// corrected.
    pub fn monotonicity_violations(&self) -> Vec<(Label, Label)> {
        let mut violations = Vec::new();
        for origin in self.cohorts() {
            let mut peak = f64::NEG_INFINITY;
            for (age, value) in self.cohort(origin) {
                if value < peak {
                    violations.push((self.index.origin(origin).clone(), self.index.age(age).clone()));
                }
                peak = peak.max(value);
            }
        }
        violations
    }
}
