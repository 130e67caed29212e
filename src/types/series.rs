//! Named numeric series extracted from a [`crate::TimeSeriesTable`].

use crate::series::error::ExtractError;
use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;

/// Members in a forecast ensemble: 51 standard runs plus the high-resolution run.
pub const ENSEMBLE_MEMBER_COUNT: usize = 52;
/// Index of the high-resolution member.
pub const HIGH_RES_MEMBER: u8 = 52;
/// Number of standard (non high-resolution) members.
pub const STANDARD_MEMBER_COUNT: u8 = 51;

/// The x axis of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValues {
    Time(Vec<NaiveDateTime>),
    Labels(Vec<String>),
    Numeric(Vec<f64>),
}

impl XValues {
    pub fn len(&self) -> usize {
        match self {
            XValues::Time(v) => v.len(),
            XValues::Labels(v) => v.len(),
            XValues::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named series with its own x axis.
///
/// Missing values are dropped per series, so two series taken from the same table
/// may have different x axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    name: String,
    x: XValues,
    y: Vec<f64>,
}

impl NamedSeries {
    pub fn try_new(name: impl Into<String>, x: XValues, y: Vec<f64>) -> Result<Self, ExtractError> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(ExtractError::LengthMismatch {
                name,
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self { name, x, y })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &XValues {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Largest value, `None` for an empty series.
    pub fn max(&self) -> Option<f64> {
        self.y.iter().copied().map(OrderedFloat).max().map(|v| v.0)
    }
}

/// The members of a forecast ensemble keyed by member index (1..=52).
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSet {
    pub members: BTreeMap<u8, NamedSeries>,
    /// Largest value over every member, used to scale the y axis.
    pub max_flow: Option<f64>,
}

impl EnsembleSet {
    pub fn member(&self, index: u8) -> Option<&NamedSeries> {
        self.members.get(&index)
    }

    pub fn high_res(&self) -> Option<&NamedSeries> {
        self.member(HIGH_RES_MEMBER)
    }

    /// Standard members (1..=51) in index order.
    pub fn standard_members(&self) -> impl Iterator<Item = (u8, &NamedSeries)> + '_ {
        self.members
            .range(1..=STANDARD_MEMBER_COUNT)
            .map(|(index, series)| (*index, series))
    }
}
