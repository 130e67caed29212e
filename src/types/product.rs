//! Defines the data products served by the GEOGloWS streamflow API and the CSV
//! schema each of them is expected to carry.

use std::fmt;

/// Flow columns shared by several products.
pub const COL_STREAMFLOW: &str = "streamflow (m^3/s)";
pub const COL_MEAN: &str = "mean (m^3/s)";
pub const COL_MAX: &str = "max (m^3/s)";
pub const COL_MIN: &str = "min (m^3/s)";
pub const COL_STD_LOWER: &str = "std_dev_range_lower (m^3/s)";
pub const COL_STD_UPPER: &str = "std_dev_range_upper (m^3/s)";
pub const COL_HIGH_RES: &str = "high_res (m^3/s)";

// Seasonal average
pub const COL_MAX_FLOW: &str = "max_flow";
pub const COL_MIN_FLOW: &str = "min_flow";

// Return periods
pub const COL_RETURN_PERIOD_2: &str = "return_period_2";
pub const COL_RETURN_PERIOD_10: &str = "return_period_10";
pub const COL_RETURN_PERIOD_20: &str = "return_period_20";

/// How the rows of a product are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// A `datetime` column holding timestamps.
    Time,
    /// An integer stream (reach) identifier.
    StreamId,
    /// A day-of-year number for climatological products.
    DayOfYear,
}

/// A data product exposed by the streamflow prediction service.
///
/// The product decides which API method is called, which column indexes the
/// parsed [`crate::TimeSeriesTable`] and which header columns must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// Summary statistics (mean, min, max, std-dev range, high-res) of the latest forecast.
    ForecastStats,
    /// Every member of the latest forecast ensemble (51 members plus the high-res run).
    ForecastEnsembles,
    /// Streams likely to reach a return-period flow in a region, keyed by stream id.
    ForecastWarnings,
    /// First-day forecasted flows of previous forecasts.
    ForecastRecords,
    /// The historic streamflow simulation.
    HistoricSimulation,
    /// Average flow for every day of the year.
    SeasonalAverage,
    /// Return-period thresholds derived from the historic simulation.
    ReturnPeriods,
}

impl Product {
    pub(crate) fn method_path(&self) -> &'static str {
        match self {
            Product::ForecastStats => "ForecastStats/",
            Product::ForecastEnsembles => "ForecastEnsembles/",
            Product::ForecastWarnings => "ForecastWarnings/",
            Product::ForecastRecords => "ForecastRecords/",
            Product::HistoricSimulation => "HistoricSimulation/",
            Product::SeasonalAverage => "SeasonalAverage/",
            Product::ReturnPeriods => "ReturnPeriods/",
        }
    }

    /// The column that indexes the rows of this product.
    pub fn index_column(&self) -> &'static str {
        match self {
            Product::ForecastWarnings => "comid",
            Product::ReturnPeriods => "rivid",
            Product::SeasonalAverage => "day_of_year",
            _ => "datetime",
        }
    }

    pub fn index_kind(&self) -> IndexKind {
        match self {
            Product::ForecastWarnings | Product::ReturnPeriods => IndexKind::StreamId,
            Product::SeasonalAverage => IndexKind::DayOfYear,
            _ => IndexKind::Time,
        }
    }

    /// Value columns that must be present in the header, besides the index column.
    ///
    /// Ensemble headers are validated member by member instead, see
    /// [`crate::parse_ensemble_column`].
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Product::ForecastStats => &[
                COL_MEAN,
                COL_MAX,
                COL_MIN,
                COL_STD_LOWER,
                COL_STD_UPPER,
                COL_HIGH_RES,
            ],
            Product::ForecastRecords | Product::HistoricSimulation => &[COL_STREAMFLOW],
            Product::SeasonalAverage => &[COL_STREAMFLOW, COL_MAX_FLOW, COL_MIN_FLOW],
            Product::ReturnPeriods => &[
                COL_RETURN_PERIOD_20,
                COL_RETURN_PERIOD_10,
                COL_RETURN_PERIOD_2,
            ],
            Product::ForecastEnsembles | Product::ForecastWarnings => &[],
        }
    }

    /// Whether non-numeric columns are tolerated. Only the warnings listing carries
    /// text columns (dates, flags); every other product is a flow series.
    pub(crate) fn allows_text_columns(&self) -> bool {
        matches!(self, Product::ForecastWarnings)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method_path().trim_end_matches('/'))
    }
}
