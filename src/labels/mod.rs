//! Label types, calendar grain and column profiling
//!
//! A column's labels are interpreted once, at ingestion, as one [`LabelKind`].
//! Every label renders to a canonical string, so triangle and factor output
//! from the same build can be joined on those keys.

mod label;
mod grain;
pub mod profile;

pub use label::{parse_date, Label, LabelKind, Period, PeriodPart};
pub use grain::Grain;
pub use profile::{aggregation_options, profile_columns, ColumnProfile};
