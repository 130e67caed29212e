use crate::series::error::ExtractError;
use crate::types::series::{EnsembleSet, NamedSeries, XValues};
use crate::types::table::{TableIndex, TimeSeriesTable};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

const ENSEMBLE_PREFIX: &str = "ensemble_";
const ENSEMBLE_SUFFIX: &str = " (m^3/s)";

/// Recovers the member index from an ensemble column name.
///
/// The service names ensemble columns `ensemble_NN (m^3/s)`, where `NN` is a
/// two-digit, zero-padded member number from `01` to `52` and `52` is the
/// high-resolution run.
///
/// ```
/// use geoglows::parse_ensemble_column;
///
/// assert_eq!(parse_ensemble_column("ensemble_07 (m^3/s)").unwrap(), 7);
/// assert_eq!(parse_ensemble_column("ensemble_52 (m^3/s)").unwrap(), 52);
/// assert!(parse_ensemble_column("ensemble_7 (m^3/s)").is_err());
/// assert!(parse_ensemble_column("ensemble_53 (m^3/s)").is_err());
/// ```
pub fn parse_ensemble_column(name: &str) -> Result<u8, ExtractError> {
    let invalid = || ExtractError::InvalidEnsembleColumn {
        column: name.to_string(),
    };
    let digits = name
        .strip_prefix(ENSEMBLE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ENSEMBLE_SUFFIX))
        .ok_or_else(invalid)?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let index: u8 = digits.parse().map_err(|_| invalid())?;
    if !(1..=52).contains(&index) {
        return Err(invalid());
    }
    Ok(index)
}

/// Column name of ensemble member `index`.
pub fn ensemble_column(index: u8) -> String {
    format!("{ENSEMBLE_PREFIX}{index:02}{ENSEMBLE_SUFFIX}")
}

/// Extracts one [`NamedSeries`] per requested column.
///
/// Each series keeps only the rows where its own column has a value, so series
/// from the same table can end up with different x axes.
///
/// # Errors
///
/// [`ExtractError::MissingSeries`] if a requested column is not a numeric column of `table`.
pub fn extract_series(
    table: &TimeSeriesTable,
    columns: &[&str],
) -> Result<Vec<NamedSeries>, ExtractError> {
    columns
        .iter()
        .map(|column| extract_one(table, column))
        .collect()
}

pub(crate) fn extract_one(table: &TimeSeriesTable, column: &str) -> Result<NamedSeries, ExtractError> {
    let values = table
        .values(column)
        .ok_or_else(|| ExtractError::MissingSeries {
            column: column.to_string(),
        })?;

    let present: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|_| row))
        .collect();
    let y: Vec<f64> = present.iter().filter_map(|&row| values[row]).collect();

    let x = match table.index() {
        TableIndex::Time(times) => XValues::Time(present.iter().map(|&row| times[row]).collect()),
        TableIndex::DayOfYear(days) => {
            XValues::Labels(present.iter().map(|&row| days[row].label()).collect())
        }
        TableIndex::StreamId(ids) => {
            XValues::Numeric(present.iter().map(|&row| ids[row] as f64).collect())
        }
    };

    NamedSeries::try_new(column, x, y)
}

/// Extracts every ensemble member of a forecast ensembles table.
///
/// # Errors
///
/// [`ExtractError::InvalidEnsembleColumn`] if a column does not follow the naming
/// convention of [`parse_ensemble_column`].
pub fn extract_ensembles(table: &TimeSeriesTable) -> Result<EnsembleSet, ExtractError> {
    let mut members = BTreeMap::new();
    for column in table.column_names() {
        let index = parse_ensemble_column(column)?;
        members.insert(index, extract_one(table, column)?);
    }

    let max_flow = members
        .values()
        .filter_map(NamedSeries::max)
        .map(OrderedFloat)
        .max()
        .map(|v| v.0);

    Ok(EnsembleSet { members, max_flow })
}
