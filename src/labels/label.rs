//! Origin, development and category labels
//!
//! Every column is inspected once per build to pick a [`LabelKind`]; each cell
//! is then parsed into a [`Label`] of that kind. Labels order naturally within
//! a kind and render to a canonical string used for output keys.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Date formats accepted for date-like labels, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Datetime formats whose date part is used
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a date-like string
///
/// Accepts ISO dates, slash dates, `YYYY-MM` (first of month) and datetimes
/// (time part dropped).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    // YYYY-MM
    if raw.len() == 7 && raw.as_bytes()[4] == b'-' {
        return NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok();
    }
    None
}

/// Parse a finite number; NaN and infinities are not labels
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Sub-year part of a calendar period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodPart {
    Year,
    Quarter(u8),
    Month(u8),
}

/// A calendar period produced by applying a grain to a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub part: PeriodPart,
}

impl Period {
    pub fn year(year: i32) -> Self {
        Self { year, part: PeriodPart::Year }
    }

    pub fn quarter(year: i32, quarter: u8) -> Self {
        Self { year, part: PeriodPart::Quarter(quarter) }
    }

    pub fn month(year: i32, month: u8) -> Self {
        Self { year, part: PeriodPart::Month(month) }
    }

    /// First day of the period
    pub fn start_date(&self) -> Option<NaiveDate> {
        let month = match self.part {
            PeriodPart::Year => 1,
            PeriodPart::Quarter(q) => (q as u32 - 1) * 3 + 1,
            PeriodPart::Month(m) => m as u32,
        };
        NaiveDate::from_ymd_opt(self.year, month, 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            PeriodPart::Year => write!(f, "{}", self.year),
            PeriodPart::Quarter(q) => write!(f, "{}Q{}", self.year, q),
            PeriodPart::Month(m) => write!(f, "{}-{:02}", self.year, m),
        }
    }
}

/// How a column's raw values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Integer,
    Number,
    Date,
    Text,
}

impl LabelKind {
    /// Infer the kind of a column from its raw values
    ///
    /// Blank values are ignored. A column with no non-blank values is `Text`.
    pub fn infer<'a, I>(values: I) -> LabelKind
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut any = false;
        let mut integer = true;
        let mut number = true;
        let mut date = true;

        for raw in values {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            any = true;
            if integer && raw.parse::<i64>().is_err() {
                integer = false;
            }
            if number && parse_finite(raw).is_none() {
                number = false;
            }
            if date && parse_date(raw).is_none() {
                date = false;
            }
            if !integer && !number && !date {
                break;
            }
        }

        if !any {
            LabelKind::Text
        } else if integer {
            LabelKind::Integer
        } else if number {
            LabelKind::Number
        } else if date {
            LabelKind::Date
        } else {
            LabelKind::Text
        }
    }

    /// Parse one raw cell; `None` for blanks or values outside this kind
    pub fn parse(&self, raw: &str) -> Option<Label> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match self {
            LabelKind::Integer => raw.parse().ok().map(Label::Integer),
            LabelKind::Number => parse_finite(raw).map(Label::Number),
            LabelKind::Date => parse_date(raw).map(Label::Date),
            LabelKind::Text => Some(Label::Text(raw.to_string())),
        }
    }
}

/// A single origin, development or category label
#[derive(Debug, Clone)]
pub enum Label {
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    Period(Period),
    Text(String),
}

impl Label {
    fn rank(&self) -> u8 {
        match self {
            Label::Integer(_) => 0,
            Label::Number(_) => 1,
            Label::Date(_) => 2,
            Label::Period(_) => 3,
            Label::Text(_) => 4,
        }
    }

    /// Whether labels of this kind have a natural ascending order
    pub fn is_orderable(&self) -> bool {
        !matches!(self, Label::Text(_))
    }

    /// Canonical output key
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Calendar year, for date-like labels
    pub fn year(&self) -> Option<i32> {
        match self {
            Label::Date(d) => Some(d.year()),
            Label::Period(p) => Some(p.year),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Integer(v) => write!(f, "{}", v),
            Label::Number(v) => write!(f, "{}", v),
            Label::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Label::Period(p) => write!(f, "{}", p),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Integer(a), Label::Integer(b)) => a.cmp(b),
            (Label::Number(a), Label::Number(b)) => a.total_cmp(b),
            (Label::Date(a), Label::Date(b)) => a.cmp(b),
            (Label::Period(a), Label::Period(b)) => a.cmp(b),
            (Label::Text(a), Label::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Label::Integer(v) => v.hash(state),
            Label::Number(v) => v.to_bits().hash(state),
            Label::Date(d) => d.hash(state),
            Label::Period(p) => p.hash(state),
            Label::Text(s) => s.hash(state),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
