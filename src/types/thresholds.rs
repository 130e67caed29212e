//! Return-period thresholds and the severity bands drawn from them.

use crate::charts::error::ChartError;
use crate::types::product::{
    Product, COL_MAX_FLOW, COL_RETURN_PERIOD_10, COL_RETURN_PERIOD_2, COL_RETURN_PERIOD_20,
};
use crate::types::table::TimeSeriesTable;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Flow thresholds for the 2, 10 and 20-year return periods of one reach.
///
/// The values are not required to be monotonic but are always consumed in
/// increasing severity order (r2, r10, r20).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnPeriodThresholds {
    pub r2: f64,
    pub r10: f64,
    pub r20: f64,
    /// Any other return periods reported alongside (e.g. 5, 25, 50, 100 years).
    pub other: BTreeMap<u32, f64>,
    /// Largest simulated flow, when the return periods table reports it.
    pub max_flow: Option<f64>,
}

impl ReturnPeriodThresholds {
    pub fn new(r2: f64, r10: f64, r20: f64) -> Self {
        Self {
            r2,
            r10,
            r20,
            other: BTreeMap::new(),
            max_flow: None,
        }
    }

    /// Reads the first row of a return periods table.
    ///
    /// Columns named `return_period_N` other than 2, 10 and 20 end up in `other`,
    /// a `max_flow` column in `max_flow`.
    pub fn from_table(table: &TimeSeriesTable) -> Result<Self, ChartError> {
        if table.product() != Product::ReturnPeriods {
            return Err(ChartError::WrongProduct {
                expected: Product::ReturnPeriods,
                found: table.product(),
            });
        }
        if table.is_empty() {
            return Err(ChartError::EmptyTable {
                product: Product::ReturnPeriods,
            });
        }

        let first = |column: &str| -> Result<f64, ChartError> {
            table
                .values(column)
                .and_then(|values| values.first().copied().flatten())
                .ok_or_else(|| ChartError::MissingThreshold {
                    column: column.to_string(),
                })
        };

        let mut thresholds = Self::new(
            first(COL_RETURN_PERIOD_2)?,
            first(COL_RETURN_PERIOD_10)?,
            first(COL_RETURN_PERIOD_20)?,
        );
        for column in table.column_names() {
            let Some(years) = column
                .strip_prefix("return_period_")
                .and_then(|n| n.parse::<u32>().ok())
            else {
                continue;
            };
            if matches!(years, 2 | 10 | 20) {
                continue;
            }
            if let Ok(value) = first(column) {
                thresholds.other.insert(years, value);
            }
        }
        thresholds.max_flow = first(COL_MAX_FLOW).ok();
        Ok(thresholds)
    }

    /// Builds thresholds from computed return periods keyed by years,
    /// e.g. the output of [`crate::compute_return_periods`].
    pub fn from_computed(computed: &BTreeMap<u32, f64>) -> Result<Self, ChartError> {
        let get = |years: u32| {
            computed
                .get(&years)
                .copied()
                .ok_or_else(|| ChartError::MissingThreshold {
                    column: format!("return_period_{years}"),
                })
        };
        let mut thresholds = Self::new(get(2)?, get(10)?, get(20)?);
        thresholds.other = computed
            .iter()
            .filter(|(years, _)| !matches!(**years, 2 | 10 | 20))
            .map(|(years, value)| (*years, *value))
            .collect();
        Ok(thresholds)
    }
}

/// Severity of a return-period band, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// 2-year return period and above.
    TwoYear,
    /// 10-year return period and above.
    TenYear,
    /// 20-year return period and above.
    TwentyYear,
}

impl Severity {
    pub fn fill_color(&self) -> &'static str {
        match self {
            Severity::TwoYear => "yellow",
            Severity::TenYear => "red",
            Severity::TwentyYear => "purple",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::TwoYear => "2-year",
            Severity::TenYear => "10-year",
            Severity::TwentyYear => "20-year",
        };
        write!(f, "{label}")
    }
}

/// A shaded rectangle in (time x flow) space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBand {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub lower: f64,
    /// May be below `lower` when the observed flows never approach the threshold.
    pub upper: f64,
    pub severity: Severity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::table::{ColumnData, TableIndex};

    fn rperiods(columns: Vec<(&str, f64)>) -> TimeSeriesTable {
        TimeSeriesTable::try_new(
            Product::ReturnPeriods,
            TableIndex::StreamId(vec![9007292]),
            columns
                .into_iter()
                .map(|(name, v)| (name.to_string(), ColumnData::Numeric(vec![Some(v)])))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn reads_thresholds_by_column_name() {
        let table = rperiods(vec![
            ("return_period_100", 50.0),
            ("return_period_20", 30.0),
            ("return_period_10", 20.0),
            ("return_period_5", 15.0),
            ("return_period_2", 12.0),
            ("max_flow", 60.0),
        ]);
        let thresholds = ReturnPeriodThresholds::from_table(&table).unwrap();
        assert_eq!((thresholds.r2, thresholds.r10, thresholds.r20), (12.0, 20.0, 30.0));
        assert_eq!(thresholds.other.get(&5), Some(&15.0));
        assert_eq!(thresholds.other.get(&100), Some(&50.0));
        assert_eq!(thresholds.other.len(), 2);
        assert_eq!(thresholds.max_flow, Some(60.0));

        let without = rperiods(vec![
            ("return_period_20", 30.0),
            ("return_period_10", 20.0),
            ("return_period_2", 12.0),
        ]);
        assert_eq!(ReturnPeriodThresholds::from_table(&without).unwrap().max_flow, None);
    }

    #[test]
    fn missing_threshold_is_reported() {
        let table = rperiods(vec![("return_period_20", 30.0), ("return_period_10", 20.0)]);
        assert!(matches!(
            ReturnPeriodThresholds::from_table(&table),
            Err(ChartError::MissingThreshold { column }) if column == "return_period_2"
        ));
    }

    #[test]
    fn rejects_other_products() {
        let table = TimeSeriesTable::try_new(
            Product::HistoricSimulation,
            TableIndex::Time(vec![]),
            vec![],
        )
        .unwrap();
        assert!(matches!(
            ReturnPeriodThresholds::from_table(&table),
            Err(ChartError::WrongProduct { .. })
        ));
    }
}
