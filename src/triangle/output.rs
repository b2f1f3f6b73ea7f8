//! Flat output rows keyed by canonical label strings

use super::builder::Triangle;
use super::factors::{AgeToAgeFactorGrid, Factor};
use super::partition::CategoryKey;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One cohort as a flat record: the origin field followed by one field per
/// column, `null` where the cell is absent
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow<T> {
    /// Field name holding the origin label
    pub origin_field: String,
    pub origin: String,
    pub fields: Vec<(String, Option<T>)>,
}

impl<T> OutputRow<T> {
    /// Cell under a column key; `None` if the key is unknown, `Some(None)` if absent
    pub fn field(&self, key: &str) -> Option<&Option<T>> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<T: Serialize> Serialize for OutputRow<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(&self.origin_field, &self.origin)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Rows per category, in partition order
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRows<T>(pub Vec<(CategoryKey, Vec<OutputRow<T>>)>);

impl<T> KeyedRows<T> {
    pub fn get(&self, key: &str) -> Option<&[OutputRow<T>]> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &CategoryKey> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Serialize> Serialize for KeyedRows<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, rows) in &self.0 {
            map.serialize_entry(key, rows)?;
        }
        map.end()
    }
}

/// One row per observed cohort, one field per age of the shared index
pub fn triangle_rows(triangle: &Triangle, origin_field: &str) -> Vec<OutputRow<f64>> {
    let index = triangle.index();
    let age_keys: Vec<String> = index.ages().iter().map(|a| a.key()).collect();

    triangle
        .cohorts()
        .into_iter()
        .map(|origin| OutputRow {
            origin_field: origin_field.to_string(),
            origin: index.origin(origin).key(),
            fields: age_keys
                .iter()
                .enumerate()
                .map(|(age, key)| (key.clone(), triangle.get(origin, age)))
                .collect(),
        })
        .collect()
}

/// One row per cohort of the source triangle, one field per age pair
pub fn factor_rows(grid: &AgeToAgeFactorGrid, origin_field: &str) -> Vec<OutputRow<Factor>> {
    let pair_keys = grid.pair_keys();

    grid.cohorts()
        .iter()
        .map(|&origin| OutputRow {
            origin_field: origin_field.to_string(),
            origin: grid.index().origin(origin).key(),
            fields: pair_keys
                .iter()
                .map(|&((from, to), ref key)| (key.clone(), grid.get(origin, from, to)))
                .collect(),
        })
        .collect()
}
