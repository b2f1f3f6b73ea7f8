//! Cohort/age index shared by every triangle of a build

use crate::labels::Label;
use crate::records::Record;
use std::collections::{HashMap, HashSet};

/// Ordered origin and development labels
///
/// Positions in these vectors are the row/column coordinates of every
/// triangle and factor grid built from the same records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleIndex {
    origins: Vec<Label>,
    ages: Vec<Label>,
    origin_pos: HashMap<Label, usize>,
    age_pos: HashMap<Label, usize>,
}

/// Distinct labels; ascending when orderable, first-seen otherwise
fn distinct_ordered<'a, I>(labels: I) -> Vec<Label>
where
    I: IntoIterator<Item = &'a Label>,
{
    let mut seen = HashSet::new();
    let mut distinct: Vec<Label> = labels
        .into_iter()
        .filter(|l| seen.insert(*l))
        .cloned()
        .collect();

    if distinct.iter().all(Label::is_orderable) {
        distinct.sort();
    }
    distinct
}

fn positions(labels: &[Label]) -> HashMap<Label, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.clone(), i))
        .collect()
}

impl TriangleIndex {
    /// Scan all records once for their origins and development ages
    pub fn from_records(records: &[Record]) -> Self {
        let origins = distinct_ordered(records.iter().map(|r| &r.origin));
        let ages = distinct_ordered(records.iter().map(|r| &r.development));
        Self::from_labels(origins, ages)
    }

    /// Index over labels already in display order
    pub fn from_labels(origins: Vec<Label>, ages: Vec<Label>) -> Self {
        Self {
            origin_pos: positions(&origins),
            age_pos: positions(&ages),
            origins,
            ages,
        }
    }

    pub fn origins(&self) -> &[Label] {
        &self.origins
    }

    pub fn ages(&self) -> &[Label] {
        &self.ages
    }

    pub fn origin_position(&self, origin: &Label) -> Option<usize> {
        self.origin_pos.get(origin).copied()
    }

    pub fn age_position(&self, age: &Label) -> Option<usize> {
        self.age_pos.get(age).copied()
    }

    pub fn origin(&self, position: usize) -> &Label {
        &self.origins[position]
    }

    pub fn age(&self, position: usize) -> &Label {
        &self.ages[position]
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(origin: Label, development: Label) -> Record {
        Record { origin, development, value: 1.0, category: None }
    }

    #[test]
    fn test_orderable_labels_sort_ascending() {
        let records = vec![
            record(Label::Integer(2019), Label::Integer(24)),
            record(Label::Integer(2018), Label::Integer(36)),
            record(Label::Integer(2019), Label::Integer(12)),
            record(Label::Integer(2018), Label::Integer(12)),
        ];
        let index = TriangleIndex::from_records(&records);

        let origins: Vec<_> = index.origins().iter().map(Label::key).collect();
        let ages: Vec<_> = index.ages().iter().map(Label::key).collect();
        assert_eq!(origins, vec!["2018", "2019"]);
        assert_eq!(ages, vec!["12", "24", "36"]);
        assert_eq!(index.age_position(&Label::Integer(36)), Some(2));
    }

    #[test]
    fn test_text_labels_keep_first_seen_order() {
        let records = vec![
            record(Label::Text("Spring".into()), Label::Text("late".into())),
            record(Label::Text("Autumn".into()), Label::Text("early".into())),
            record(Label::Text("Spring".into()), Label::Text("early".into())),
        ];
        let index = TriangleIndex::from_records(&records);

        let origins: Vec<_> = index.origins().iter().map(Label::key).collect();
        let ages: Vec<_> = index.ages().iter().map(Label::key).collect();
        assert_eq!(origins, vec!["Spring", "Autumn"]);
        assert_eq!(ages, vec!["late", "early"]);
    }

    #[test]
    fn test_empty_records() {
        let index = TriangleIndex::from_records(&[]);
        assert!(index.is_empty());
        assert!(index.ages().is_empty());
    }
}
