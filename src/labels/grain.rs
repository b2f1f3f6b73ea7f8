//! Calendar grain for date-like origin and development columns

use super::label::{Label, Period};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Aggregation level applied to date labels before indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Yearly,
    Quarterly,
    Monthly,
}

impl Grain {
    /// All grains, coarsest first
    pub const ALL: [Grain; 3] = [Grain::Yearly, Grain::Quarterly, Grain::Monthly];

    /// Map a label onto this grain
    ///
    /// Dates become the period containing them. Periods are only re-graded
    /// to a coarser grain. Other labels pass through unchanged.
    pub fn apply(&self, label: Label) -> Label {
        match label {
            Label::Date(d) => Label::Period(self.period_of(d.year(), d.month())),
            Label::Period(p) => match p.start_date() {
                Some(start) if self.is_coarser_or_equal(&p) => {
                    Label::Period(self.period_of(start.year(), start.month()))
                }
                _ => Label::Period(p),
            },
            other => other,
        }
    }

    fn period_of(&self, year: i32, month: u32) -> Period {
        match self {
            Grain::Yearly => Period::year(year),
            Grain::Quarterly => Period::quarter(year, ((month - 1) / 3 + 1) as u8),
            Grain::Monthly => Period::month(year, month as u8),
        }
    }

    fn is_coarser_or_equal(&self, period: &Period) -> bool {
        use super::label::PeriodPart;
        match (self, period.part) {
            (Grain::Yearly, _) => true,
            (Grain::Quarterly, PeriodPart::Quarter(_) | PeriodPart::Month(_)) => true,
            (Grain::Monthly, PeriodPart::Month(_)) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grain::Yearly => "yearly",
            Grain::Quarterly => "quarterly",
            Grain::Monthly => "monthly",
        }
    }
}
