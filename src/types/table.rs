//! The canonical tabular form of every parsed API response.

use crate::parse::error::ParseError;
use crate::types::day_of_year::DayOfYear;
use crate::types::product::Product;
use chrono::NaiveDateTime;
use polars::prelude::{Column, DataFrame, DataType};
use std::fmt::Display;

/// Row keys of a [`TimeSeriesTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableIndex {
    /// Timestamps, strictly increasing.
    Time(Vec<NaiveDateTime>),
    /// Stream (reach) identifiers, strictly increasing.
    StreamId(Vec<i64>),
    /// Days of the year, strictly increasing.
    DayOfYear(Vec<DayOfYear>),
}

impl TableIndex {
    pub fn len(&self) -> usize {
        match self {
            TableIndex::Time(v) => v.len(),
            TableIndex::StreamId(v) => v.len(),
            TableIndex::DayOfYear(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_increasing(&self, column: &str) -> Result<(), ParseError> {
        match self {
            TableIndex::Time(v) => check_strictly_increasing(v, column),
            TableIndex::StreamId(v) => check_strictly_increasing(v, column),
            TableIndex::DayOfYear(v) => check_strictly_increasing(v, column),
        }
    }
}

fn check_strictly_increasing<T: Ord + Display>(values: &[T], column: &str) -> Result<(), ParseError> {
    for (row, pair) in values.windows(2).enumerate() {
        match pair[0].cmp(&pair[1]) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => {
                return Err(ParseError::DuplicateIndex {
                    column: column.to_string(),
                    value: pair[1].to_string(),
                })
            }
            std::cmp::Ordering::Greater => {
                return Err(ParseError::NotIncreasing {
                    column: column.to_string(),
                    row: row + 1,
                })
            }
        }
    }
    Ok(())
}

/// Values of one table column, as handed to [`TimeSeriesTable::try_new`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    /// Only produced for the forecast warnings listing.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            ColumnData::Numeric(v) => Column::new(name.into(), v),
            ColumnData::Text(v) => Column::new(name.into(), v),
        }
    }
}

/// An immutable, index-keyed table parsed from one API response.
///
/// The index lives next to a Polars [`DataFrame`] holding the value columns, one
/// frame row per index entry. Flow columns are `Float64` with nulls for missing
/// values.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    product: Product,
    index: TableIndex,
    frame: DataFrame,
}

impl TimeSeriesTable {
    /// Builds a table, checking that the index is strictly increasing and that every
    /// column has one value per index entry.
    pub fn try_new(
        product: Product,
        index: TableIndex,
        columns: Vec<(String, ColumnData)>,
    ) -> Result<Self, ParseError> {
        index.check_increasing(product.index_column())?;

        let expected = index.len();
        let mut frame_columns = Vec::with_capacity(columns.len());
        for (name, data) in columns {
            if data.len() != expected {
                return Err(ParseError::LengthMismatch {
                    column: name,
                    expected,
                    found: data.len(),
                });
            }
            frame_columns.push(data.into_column(&name));
        }
        let frame = DataFrame::new(frame_columns)?;

        Ok(Self {
            product,
            index,
            frame,
        })
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn index(&self) -> &TableIndex {
        &self.index
    }

    /// The value columns as a Polars frame (the index is not part of it).
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Timestamps of a time-indexed table.
    pub fn times(&self) -> Option<&[NaiveDateTime]> {
        match &self.index {
            TableIndex::Time(times) => Some(times),
            _ => None,
        }
    }

    /// First and last timestamp of a non-empty time-indexed table.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let times = self.times()?;
        Some((*times.first()?, *times.last()?))
    }

    /// Values of a numeric column, `None` entries being missing values.
    pub fn values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.frame.column(name).ok()?;
        if column.dtype() != &DataType::Float64 {
            return None;
        }
        Some(column.f64().ok()?.into_iter().collect())
    }

    /// Values of a text column (forecast warnings only).
    pub fn text(&self, name: &str) -> Option<Vec<Option<String>>> {
        let column = self.frame.column(name).ok()?;
        Some(
            column
                .str()
                .ok()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect(),
        )
    }
}
