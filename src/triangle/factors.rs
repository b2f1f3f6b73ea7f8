//! Age-to-age development factors
//!
//! For each cohort, the ratio of cumulative values between consecutive ages
//! *that cohort actually has*. A cohort observed at 12 and 36 but not 24
//! yields one factor spanning 12-36.

use super::builder::Triangle;
use super::index::TriangleIndex;
use super::partition::CategoryKey;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Marker written for undefined factors
pub const UNDEFINED_MARKER: &str = "undefined";

/// One development factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Factor {
    Defined(f64),
    /// Cumulative value at the earlier age was zero, or the ratio overflowed
    Undefined,
}

impl Factor {
    /// Ratio `later / earlier`, undefined when `earlier` is zero or the
    /// ratio is not finite
    pub fn ratio(earlier: f64, later: f64) -> Self {
        if earlier == 0.0 {
            return Factor::Undefined;
        }
        let ratio = later / earlier;
        if ratio.is_finite() {
            Factor::Defined(ratio)
        } else {
            Factor::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Factor::Defined(v) => Some(*v),
            Factor::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Factor::Undefined)
    }
}

impl Serialize for Factor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Factor::Defined(v) => serializer.serialize_f64(*v),
            Factor::Undefined => serializer.serialize_str(UNDEFINED_MARKER),
        }
    }
}

/// Age pair as (earlier age position, later age position)
pub type AgePair = (usize, usize);

/// Factor grid derived from exactly one triangle
#[derive(Debug, Clone, PartialEq)]
pub struct AgeToAgeFactorGrid {
    category: CategoryKey,
    index: Arc<TriangleIndex>,
    /// Keyed by (origin position, earlier age, later age)
    factors: BTreeMap<(usize, usize, usize), Factor>,
    cohorts: Vec<usize>,
}

impl AgeToAgeFactorGrid {
    pub fn from_triangle(triangle: &Triangle) -> Self {
        let mut factors = BTreeMap::new();
        let cohorts = triangle.cohorts();

        for &origin in &cohorts {
            let cells: Vec<(usize, f64)> = triangle.cohort(origin).collect();
            for pair in cells.windows(2) {
                let (from, earlier) = pair[0];
                let (to, later) = pair[1];
                factors.insert((origin, from, to), Factor::ratio(earlier, later));
            }
        }

        Self {
            category: triangle.category().clone(),
            index: Arc::clone(triangle.index()),
            factors,
            cohorts,
        }
    }

    pub fn category(&self) -> &CategoryKey {
        &self.category
    }

    pub fn index(&self) -> &Arc<TriangleIndex> {
        &self.index
    }

    pub fn get(&self, origin: usize, from: usize, to: usize) -> Option<Factor> {
        self.factors.get(&(origin, from, to)).copied()
    }

    /// Every age pair any cohort has, ordered by (from, to)
    pub fn pairs(&self) -> Vec<AgePair> {
        self.factors
            .keys()
            .map(|&(_, from, to)| (from, to))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Origins of the source triangle, including single-age cohorts
    pub fn cohorts(&self) -> &[usize] {
        &self.cohorts
    }

    /// Output key of an age pair, e.g. `12-24`
    pub fn pair_key(&self, (from, to): AgePair) -> String {
        format!("{}-{}", self.index.age(from), self.index.age(to))
    }

    /// Pair key with `\` and `-` escaped inside each age, e.g. `a\-b-c`
    fn escaped_pair_key(&self, (from, to): AgePair) -> String {
        let escape = |s: String| s.replace('\\', "\\\\").replace('-', "\\-");
        format!("{}-{}", escape(self.index.age(from).key()), escape(self.index.age(to).key()))
    }

    /// Every pair with its output key, ordered like [`pairs`](Self::pairs)
    ///
    /// Keys are the plain `from-to` form unless two pairs would share one
    /// (ages that themselves contain `-`); then every key is escaped.
    pub fn pair_keys(&self) -> Vec<(AgePair, String)> {
        let pairs = self.pairs();
        let plain: Vec<String> = pairs.iter().map(|&p| self.pair_key(p)).collect();
        let distinct: BTreeSet<&String> = plain.iter().collect();

        if distinct.len() == plain.len() {
            pairs.into_iter().zip(plain).collect()
        } else {
            pairs
                .into_iter()
                .map(|p| (p, self.escaped_pair_key(p)))
                .collect()
        }
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
