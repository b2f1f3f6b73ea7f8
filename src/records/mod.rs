//! Input record sets and the record normalizer

mod data;
pub mod loader;
mod normalize;

pub use data::RecordSet;
pub use normalize::{coerce_value, normalize, validate_columns, NormalizedRecords, Record};
pub(crate) use normalize::column_labels;
