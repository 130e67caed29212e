use crate::parse::error::ParseError;
use crate::series::extractor::parse_ensemble_column;
use crate::types::day_of_year::{DayOfYear, DayOfYearBase};
use crate::types::product::{IndexKind, Product};
use crate::types::table::{ColumnData, TableIndex, TimeSeriesTable};
use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;
use std::io::Cursor;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Knobs for [`parse_response_with`].
///
/// ```
/// use geoglows::{DayOfYearBase, ParseOptions};
///
/// let options = ParseOptions::builder()
///     .day_of_year_base(DayOfYearBase::OneBased)
///     .build();
/// assert_eq!(options.day_of_year_base, DayOfYearBase::OneBased);
/// ```
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ParseOptions {
    /// Numbering of the raw `day_of_year` column of seasonal averages.
    #[builder(default)]
    pub day_of_year_base: DayOfYearBase,
}

/// Parses a CSV response body of `product` with default [`ParseOptions`].
pub fn parse_response(product: Product, body: &[u8]) -> Result<TimeSeriesTable, ParseError> {
    parse_response_with(product, body, &ParseOptions::default())
}

/// Parses a CSV response body into a [`TimeSeriesTable`].
///
/// The header is checked against the schema of `product`, the index column is
/// parsed (timestamps, stream ids or days of year) and the rows are sorted by it.
/// Every other column becomes a `Float64` column where empty fields and `NaN`
/// are missing values.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the offending column when the header does not match,
/// an index value cannot be parsed, a flow value is not numeric, or the index
/// contains duplicates.
pub fn parse_response_with(
    product: Product,
    body: &[u8],
    options: &ParseOptions,
) -> Result<TimeSeriesTable, ParseError> {
    // Everything is read as text so that parse failures can name the field.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(|source| ParseError::Csv { product, source })?;

    let index_column = product.index_column();
    let header: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    validate_header(product, &header)?;

    let raw_index = df.column(index_column)?.str()?;
    let index = parse_index(product, index_column, raw_index, options)?;
    let order = index.sort_order();
    let index = index.permuted(&order);

    let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
    for name in header.iter().filter(|name| name.as_str() != index_column) {
        let raw = df.column(name)?.str()?;
        let data = parse_values(product, name, raw)?;
        columns.push((name.clone(), data.permuted(&order)));
    }

    let table = TimeSeriesTable::try_new(product, index, columns)?;
    debug!(
        "Parsed {} response: {} rows, {} value columns",
        product,
        table.height(),
        table.frame().width()
    );
    Ok(table)
}

fn validate_header(product: Product, header: &[String]) -> Result<(), ParseError> {
    let index_column = product.index_column();
    let has = |column: &str| header.iter().any(|name| name == column);

    if !has(index_column) {
        return Err(ParseError::MissingColumn {
            product,
            column: index_column.to_string(),
        });
    }
    if let Some(missing) = product.required_columns().iter().find(|c| !has(c)) {
        return Err(ParseError::MissingColumn {
            product,
            column: missing.to_string(),
        });
    }
    if product == Product::ForecastEnsembles {
        for name in header.iter().filter(|name| name.as_str() != index_column) {
            if parse_ensemble_column(name).is_err() {
                warn!("Unexpected ensemble column '{}'", name);
                return Err(ParseError::UnexpectedColumn {
                    product,
                    column: name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// The parsed index before sorting.
enum RawIndex {
    Time(Vec<NaiveDateTime>),
    StreamId(Vec<i64>),
    DayOfYear(Vec<DayOfYear>),
}

impl RawIndex {
    fn sort_order(&self) -> Vec<usize> {
        match self {
            RawIndex::Time(v) => sort_order(v),
            RawIndex::StreamId(v) => sort_order(v),
            RawIndex::DayOfYear(v) => sort_order(v),
        }
    }

    fn permuted(self, order: &[usize]) -> TableIndex {
        match self {
            RawIndex::Time(v) => TableIndex::Time(permute(&v, order)),
            RawIndex::StreamId(v) => TableIndex::StreamId(permute(&v, order)),
            RawIndex::DayOfYear(v) => TableIndex::DayOfYear(permute(&v, order)),
        }
    }
}

impl ColumnData {
    fn permuted(self, order: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(permute(&v, order)),
            ColumnData::Text(v) => ColumnData::Text(permute(&v, order)),
        }
    }
}

fn sort_order<T: Ord>(keys: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    order
}

fn permute<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}

fn parse_index(
    product: Product,
    column: &str,
    raw: &StringChunked,
    options: &ParseOptions,
) -> Result<RawIndex, ParseError> {
    let mut cells = Vec::with_capacity(raw.len());
    for (row, value) in raw.into_iter().enumerate() {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => cells.push((row, v)),
            None => {
                return Err(ParseError::MissingIndexValue {
                    column: column.to_string(),
                    row,
                })
            }
        }
    }

    let index = match product.index_kind() {
        IndexKind::Time => RawIndex::Time(
            cells
                .into_iter()
                .map(|(row, v)| {
                    parse_timestamp(v).ok_or_else(|| ParseError::InvalidTimestamp {
                        column: column.to_string(),
                        row,
                        value: v.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
        IndexKind::StreamId => RawIndex::StreamId(
            cells
                .into_iter()
                .map(|(row, v)| {
                    parse_integer(v).ok_or_else(|| ParseError::InvalidStreamId {
                        column: column.to_string(),
                        row,
                        value: v.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
        IndexKind::DayOfYear => {
            let offset = options.day_of_year_base.offset();
            RawIndex::DayOfYear(
                cells
                    .into_iter()
                    .map(|(row, v)| {
                        let raw_day =
                            parse_integer(v).ok_or_else(|| ParseError::InvalidDayOfYear {
                                column: column.to_string(),
                                row,
                                value: v.to_string(),
                            })?;
                        let day = raw_day.checked_add(offset).ok_or_else(|| {
                            ParseError::InvalidDayOfYear {
                                column: column.to_string(),
                                row,
                                value: v.to_string(),
                            }
                        })?;
                        u16::try_from(day)
                            .ok()
                            .and_then(DayOfYear::new)
                            .ok_or(ParseError::DayOfYearOutOfRange { row, day })
                    })
                    .collect::<Result<_, _>>()?,
            )
        }
    };
    Ok(index)
}

fn parse_values(
    product: Product,
    column: &str,
    raw: &StringChunked,
) -> Result<ColumnData, ParseError> {
    let mut values = Vec::with_capacity(raw.len());
    for (row, cell) in raw.into_iter().enumerate() {
        match parse_flow(cell) {
            Ok(value) => values.push(value),
            Err(bad) if product.allows_text_columns() => {
                debug!("Keeping column '{}' of {} as text ('{}')", column, product, bad);
                return Ok(ColumnData::Text(
                    raw.into_iter().map(|v| v.map(str::to_string)).collect(),
                ));
            }
            Err(bad) => {
                return Err(ParseError::InvalidValue {
                    column: column.to_string(),
                    row,
                    value: bad.to_string(),
                })
            }
        }
    }
    Ok(ColumnData::Numeric(values))
}

/// Parses one flow cell. Empty cells and NaN are missing, infinities are invalid;
/// the error carries the raw text.
fn parse_flow(cell: Option<&str>) -> Result<Option<f64>, &str> {
    let Some(text) = cell.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(text),
    }
}

const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn parse_integer(text: &str) -> Option<i64> {
    text.parse::<i64>().ok().or_else(|| {
        // Stream ids occasionally arrive as "123.0".
        let v = text.parse::<f64>().ok()?;
        // Anything at or beyond 2^63 would saturate on the cast.
        (v.is_finite() && v.fract() == 0.0 && v.abs() < I64_BOUND).then_some(v as i64)
    })
}

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::{COL_MAX_FLOW, COL_MIN_FLOW, COL_STREAMFLOW};

    const STATS: &str = "datetime,mean (m^3/s),max (m^3/s),min (m^3/s),std_dev_range_lower (m^3/s),std_dev_range_upper (m^3/s),high_res (m^3/s)\n\
        2024-05-02 00:00:00,11,16,4,7,13,\n\
        2024-05-01 00:00:00,10,15,5,8,12,9\n\
        2024-05-01 12:00:00,10.5,15.5,4.5,7.5,12.5,9.5\n";

    #[test]
    fn time_index_is_sorted_and_strictly_increasing() {
        let table = parse_response(Product::ForecastStats, STATS.as_bytes()).unwrap();
        let times = table.times().unwrap();
        assert_eq!(times.len(), 3);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            table.values("mean (m^3/s)").unwrap(),
            vec![Some(10.0), Some(10.5), Some(11.0)]
        );
        // The empty high-res cell of the last row is a missing value.
        assert_eq!(
            table.values("high_res (m^3/s)").unwrap(),
            vec![Some(9.0), Some(9.5), None]
        );
    }

    #[test]
    fn missing_header_names_the_column() {
        let body = "datetime,mean (m^3/s)\n2024-05-01 00:00:00,1\n";
        match parse_response(Product::ForecastStats, body.as_bytes()) {
            Err(ParseError::MissingColumn { column, .. }) => assert_eq!(column, "max (m^3/s)"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_names_the_field() {
        let body = "datetime,streamflow (m^3/s)\n2024-05-01 00:00:00,1\n05/02/2024,2\n";
        match parse_response(Product::HistoricSimulation, body.as_bytes()) {
            Err(ParseError::InvalidTimestamp { column, row, value }) => {
                assert_eq!(column, "datetime");
                assert_eq!(row, 1);
                assert_eq!(value, "05/02/2024");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_flow_names_the_field() {
        let body = "datetime,streamflow (m^3/s)\n2024-05-01,1\n2024-05-02,lots\n";
        match parse_response(Product::ForecastRecords, body.as_bytes()) {
            Err(ParseError::InvalidValue { column, value, .. }) => {
                assert_eq!(column, COL_STREAMFLOW);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_timestamps_are_rejected() {
        let body = "datetime,streamflow (m^3/s)\n2024-05-01,1\n2024-05-01 00:00:00,2\n";
        assert!(matches!(
            parse_response(Product::HistoricSimulation, body.as_bytes()),
            Err(ParseError::DuplicateIndex { .. })
        ));
    }

    #[test]
    fn return_periods_are_indexed_by_stream_id() {
        let body = "rivid,return_period_20,return_period_10,return_period_2\n9007292,30.0,20.0,12.0\n";
        let table = parse_response(Product::ReturnPeriods, body.as_bytes()).unwrap();
        assert_eq!(table.index(), &TableIndex::StreamId(vec![9007292]));
        assert_eq!(table.values("return_period_2").unwrap(), vec![Some(12.0)]);
    }

    #[test]
    fn warnings_keep_text_columns() {
        let body = "comid,peak_date,max_forecasted_flow\n200.0,2024-05-03,15.5\n100,2024-05-02,11\n";
        let table = parse_response(Product::ForecastWarnings, body.as_bytes()).unwrap();
        assert_eq!(table.index(), &TableIndex::StreamId(vec![100, 200]));
        assert_eq!(
            table.text("peak_date").unwrap(),
            vec![Some("2024-05-02".to_string()), Some("2024-05-03".to_string())]
        );
        assert_eq!(
            table.values("max_forecasted_flow").unwrap(),
            vec![Some(11.0), Some(15.5)]
        );
    }

    #[test]
    fn seasonal_zero_based_days_are_shifted() {
        let body = format!(
            "day_of_year,{COL_STREAMFLOW},{COL_MAX_FLOW},{COL_MIN_FLOW}\n59,3,4,2\n0,1,2,0.5\n58,2,3,1\n"
        );
        let table = parse_response(Product::SeasonalAverage, body.as_bytes()).unwrap();
        let TableIndex::DayOfYear(days) = table.index() else {
            panic!("expected a day-of-year index");
        };
        let labels: Vec<String> = days.iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["Jan 01", "Feb 28", "Mar 01"]);
    }

    #[test]
    fn seasonal_one_based_days_are_used_as_is() {
        let body = format!("day_of_year,{COL_STREAMFLOW},{COL_MAX_FLOW},{COL_MIN_FLOW}\n1,1,2,0\n59,1,2,0\n");
        let options = ParseOptions::builder()
            .day_of_year_base(DayOfYearBase::OneBased)
            .build();
        let table = parse_response_with(Product::SeasonalAverage, body.as_bytes(), &options).unwrap();
        let TableIndex::DayOfYear(days) = table.index() else {
            panic!("expected a day-of-year index");
        };
        assert_eq!(days[0].label(), "Jan 01");
        assert_eq!(days[1].label(), "Feb 28");
    }

    #[test]
    fn seasonal_day_out_of_range_fails() {
        let body = format!("day_of_year,{COL_STREAMFLOW},{COL_MAX_FLOW},{COL_MIN_FLOW}\n366,1,2,0\n");
        assert!(matches!(
            parse_response(Product::SeasonalAverage, body.as_bytes()),
            Err(ParseError::DayOfYearOutOfRange { day: 367, .. })
        ));
    }

    #[test]
    fn seasonal_day_at_integer_limit_fails_without_overflow() {
        for raw in ["9223372036854775807", "1e300"] {
            let body = format!("day_of_year,{COL_STREAMFLOW},{COL_MAX_FLOW},{COL_MIN_FLOW}\n{raw},1,2,0\n");
            match parse_response(Product::SeasonalAverage, body.as_bytes()) {
                Err(ParseError::InvalidDayOfYear { column, row, value }) => {
                    assert_eq!(column, "day_of_year");
                    assert_eq!(row, 0);
                    assert_eq!(value, raw);
                }
                other => panic!("unexpected result for {raw}: {other:?}"),
            }
        }
    }

    #[test]
    fn stream_id_beyond_i64_is_rejected() {
        let body = "rivid,return_period_20,return_period_10,return_period_2\n1e30,30.0,20.0,12.0\n";
        match parse_response(Product::ReturnPeriods, body.as_bytes()) {
            Err(ParseError::InvalidStreamId { value, .. }) => assert_eq!(value, "1e30"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(parse_integer("9007292.0"), Some(9007292));
        assert_eq!(parse_integer("-9.3e18"), None);
    }

    #[test]
    fn infinite_flow_is_invalid() {
        for raw in ["inf", "-inf", "Infinity"] {
            let body = format!("datetime,{COL_STREAMFLOW}\n2024-05-01,1\n2024-05-02,{raw}\n");
            match parse_response(Product::ForecastRecords, body.as_bytes()) {
                Err(ParseError::InvalidValue { row, value, .. }) => {
                    assert_eq!(row, 1);
                    assert_eq!(value, raw);
                }
                other => panic!("unexpected result for {raw}: {other:?}"),
            }
        }
        assert_eq!(parse_flow(Some("NaN")), Ok(None));
    }

    #[test]
    fn unexpected_ensemble_column_is_rejected() {
        let body = "datetime,ensemble_01 (m^3/s),ensemble_x (m^3/s)\n2024-05-01,1,2\n";
        match parse_response(Product::ForecastEnsembles, body.as_bytes()) {
            Err(ParseError::UnexpectedColumn { column, .. }) => {
                assert_eq!(column, "ensemble_x (m^3/s)")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-01 06:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T06:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
