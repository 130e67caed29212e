use crate::analysis::error::AnalysisError;
use crate::series::extractor::extract_one;
use crate::types::month_day::MonthDay;
use crate::types::product::{Product, COL_STREAMFLOW};
use crate::types::series::XValues;
use crate::types::table::TimeSeriesTable;
use chrono::{Datelike, NaiveDateTime};
use log::debug;
use std::collections::BTreeMap;

pub(crate) fn simulated_flow(
    historical: &TimeSeriesTable,
) -> Result<(Vec<NaiveDateTime>, Vec<f64>), AnalysisError> {
    if historical.product() != Product::HistoricSimulation {
        return Err(AnalysisError::WrongProduct {
            expected: Product::HistoricSimulation,
            found: historical.product(),
        });
    }
    let series = extract_one(historical, COL_STREAMFLOW)?;
    let XValues::Time(times) = series.x() else {
        return Ok((Vec::new(), Vec::new()));
    };
    Ok((times.clone(), series.y().to_vec()))
}

/// Trailing mean over `window` samples; the first samples average what is available.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            if i >= window {
                sum -= values[i - window];
            }
            sum / (i + 1).min(window) as f64
        })
        .collect()
}

fn mean_by<K: Ord>(keys: impl Iterator<Item = K>, values: &[f64]) -> BTreeMap<K, f64> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, &v) in keys.zip(values) {
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Mean simulated flow for every calendar day present in a historic simulation.
///
/// With `rolling_window`, the flows are first smoothed with a trailing mean over
/// that many samples.
///
/// # Errors
///
/// [`AnalysisError::InvalidWindow`] for a zero window, [`AnalysisError::WrongProduct`]
/// for anything but a historic simulation.
pub fn compute_daily_average(
    historical: &TimeSeriesTable,
    rolling_window: Option<usize>,
) -> Result<BTreeMap<MonthDay, f64>, AnalysisError> {
    if rolling_window == Some(0) {
        return Err(AnalysisError::InvalidWindow(0));
    }
    let (times, mut flows) = simulated_flow(historical)?;
    if let Some(window) = rolling_window {
        flows = rolling_mean(&flows, window);
    }
    let averages = mean_by(times.iter().map(MonthDay::of), &flows);
    debug!("Daily averages over {} samples: {} days", flows.len(), averages.len());
    Ok(averages)
}

/// Mean simulated flow per calendar month, keyed 1..=12.
pub fn compute_monthly_average(
    historical: &TimeSeriesTable,
) -> Result<BTreeMap<u32, f64>, AnalysisError> {
    let (times, flows) = simulated_flow(historical)?;
    Ok(mean_by(times.iter().map(|t| t.month()), &flows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::table::{ColumnData, TableIndex};
    use chrono::NaiveDate;

    fn historical_days(rows: &[(i32, u32, u32, f64)]) -> TimeSeriesTable {
        TimeSeriesTable::try_new(
            Product::HistoricSimulation,
            TableIndex::Time(
                rows.iter()
                    .map(|&(y, m, d, _)| {
                        NaiveDate::from_ymd_opt(y, m, d)
                            .unwrap()
                            .and_hms_opt(0, 0, 0)
                            .unwrap()
                    })
                    .collect(),
            ),
            vec![(
                COL_STREAMFLOW.to_string(),
                ColumnData::Numeric(rows.iter().map(|&(.., f)| Some(f)).collect()),
            )],
        )
        .unwrap()
    }

    fn key(m: u32, d: u32) -> MonthDay {
        MonthDay::of(&NaiveDate::from_ymd_opt(2000, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn daily_average_groups_calendar_days_across_years() {
        let table = historical_days(&[
            (2000, 5, 1, 10.0),
            (2000, 5, 2, 20.0),
            (2001, 5, 1, 30.0),
            (2001, 5, 2, 40.0),
            (2004, 2, 29, 7.0),
        ]);
        let averages = compute_daily_average(&table, None).unwrap();
        assert_eq!(averages.len(), 3);
        assert_eq!(averages[&key(5, 1)], 20.0);
        assert_eq!(averages[&key(5, 2)], 30.0);
        assert_eq!(averages[&key(2, 29)], 7.0);
    }

    #[test]
    fn rolling_window_smooths_before_grouping() {
        assert_eq!(rolling_mean(&[2.0, 4.0, 6.0, 8.0], 2), vec![2.0, 3.0, 5.0, 7.0]);
        assert_eq!(rolling_mean(&[2.0, 4.0], 1), vec![2.0, 4.0]);

        let table = historical_days(&[(2000, 1, 1, 2.0), (2000, 1, 2, 4.0), (2000, 1, 3, 6.0)]);
        let averages = compute_daily_average(&table, Some(3)).unwrap();
        assert_eq!(averages[&key(1, 1)], 2.0);
        assert_eq!(averages[&key(1, 2)], 3.0);
        assert_eq!(averages[&key(1, 3)], 4.0);
        assert!(matches!(
            compute_daily_average(&table, Some(0)),
            Err(AnalysisError::InvalidWindow(0))
        ));
    }

    #[test]
    fn monthly_average_per_month() {
        let table = historical_days(&[
            (2000, 1, 1, 1.0),
            (2000, 1, 15, 3.0),
            (2000, 7, 4, 10.0),
            (2001, 1, 10, 5.0),
        ]);
        let averages = compute_monthly_average(&table).unwrap();
        assert_eq!(averages.keys().copied().collect::<Vec<_>>(), vec![1, 7]);
        assert_eq!(averages[&1], 3.0);
        assert_eq!(averages[&7], 10.0);
    }

    #[test]
    fn averages_need_a_historic_simulation() {
        let table = TimeSeriesTable::try_new(
            Product::ForecastRecords,
            TableIndex::Time(vec![]),
            vec![(COL_STREAMFLOW.to_string(), ColumnData::Numeric(vec![]))],
        )
        .unwrap();
        assert!(matches!(
            compute_monthly_average(&table),
            Err(AnalysisError::WrongProduct { .. })
        ));
    }
}
