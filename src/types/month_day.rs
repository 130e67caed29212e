use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Calendar day key used by daily climatologies. Feb 29 is its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u8,
    day: u8,
}

impl MonthDay {
    pub fn of(time: &NaiveDateTime) -> Self {
        // month() is 1..=12 and day() is 1..=31, both fit in u8
        Self {
            month: time.month() as u8,
            day: time.day() as u8,
        }
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }
}

/// Formats as `%m/%d`, e.g. "05/01".
impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
