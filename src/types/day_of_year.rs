//! Day-of-year index for the seasonal average product.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Non-leap year used to turn day numbers into month/day labels.
const REFERENCE_YEAR: i32 = 2001;

/// Which numbering the raw `day_of_year` column uses.
///
/// The streamflow service numbers days from 0, so [`DayOfYearBase::ZeroBased`] is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOfYearBase {
    /// 0 is January 1st. Raw values are shifted by +1.
    #[default]
    ZeroBased,
    /// 1 is January 1st. Raw values are used unchanged.
    OneBased,
}

impl DayOfYearBase {
    pub(crate) fn offset(&self) -> i64 {
        match self {
            DayOfYearBase::ZeroBased => 1,
            DayOfYearBase::OneBased => 0,
        }
    }
}

/// A 1-based day of the year (1..=366).
///
/// Labels come from a non-leap reference year, so day 60 is "Mar 01". Day 366,
/// which only appears in climatologies that keep the leap day, is labelled "Dec 31".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfYear(u16);

impl DayOfYear {
    pub fn new(day: u16) -> Option<Self> {
        (1..=366).contains(&day).then_some(Self(day))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Month and day label, e.g. "Jan 01".
    pub fn label(self) -> String {
        let day = u32::from(self.0.min(365));
        NaiveDate::from_yo_opt(REFERENCE_YEAR, day)
            .map(|d| d.format("%b %d").to_string())
            .unwrap_or_else(|| "Dec 31".to_string())
    }
}

impl fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for DayOfYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
