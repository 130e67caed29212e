use crate::analysis::error::AnalysisError;
use crate::series::extractor::extract_one;
use crate::types::month_day::MonthDay;
use crate::types::product::{Product, COL_MEAN};
use crate::types::series::{NamedSeries, XValues};
use crate::types::table::TimeSeriesTable;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use std::collections::BTreeMap;

pub const COL_ANOMALY: &str = "anomaly (m^3/s)";

/// Difference between the mean forecast flow and the daily average of the same
/// calendar day.
///
/// With `daily`, the forecast mean is first averaged per calendar date and stamped at
/// midnight. Forecast steps whose calendar day has no average are dropped.
///
/// ```no_run
/// # fn run(stats: &geoglows::TimeSeriesTable, hist: &geoglows::TimeSeriesTable) -> Result<(), geoglows::GeoglowsError> {
/// use geoglows::{compute_anomaly, compute_daily_average};
///
/// let averages = compute_daily_average(hist, None)?;
/// let anomaly = compute_anomaly(stats, &averages, true)?;
/// println!("{} days compared", anomaly.len());
/// # Ok(())
/// # }
/// ```
pub fn compute_anomaly(
    stats: &TimeSeriesTable,
    daily_averages: &BTreeMap<MonthDay, f64>,
    daily: bool,
) -> Result<NamedSeries, AnalysisError> {
    if stats.product() != Product::ForecastStats {
        return Err(AnalysisError::WrongProduct {
            expected: Product::ForecastStats,
            found: stats.product(),
        });
    }
    let mean = extract_one(stats, COL_MEAN)?;
    let XValues::Time(times) = mean.x() else {
        return Ok(NamedSeries::try_new(COL_ANOMALY, XValues::Time(Vec::new()), Vec::new())?);
    };

    let forecast: Vec<(NaiveDateTime, f64)> = if daily {
        daily_means(times, mean.y())
    } else {
        times.iter().copied().zip(mean.y().iter().copied()).collect()
    };

    let (x, y): (Vec<NaiveDateTime>, Vec<f64>) = forecast
        .into_iter()
        .filter_map(|(time, flow)| {
            daily_averages
                .get(&MonthDay::of(&time))
                .map(|average| (time, flow - average))
        })
        .unzip();
    debug!("Anomaly over {} forecast steps", y.len());
    Ok(NamedSeries::try_new(COL_ANOMALY, XValues::Time(x), y)?)
}

fn daily_means(times: &[NaiveDateTime], flows: &[f64]) -> Vec<(NaiveDateTime, f64)> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (time, &flow) in times.iter().zip(flows) {
        let entry = days.entry(time.date()).or_insert((0.0, 0));
        entry.0 += flow;
        entry.1 += 1;
    }
    days.into_iter()
        .filter_map(|(date, (sum, count))| {
            date.and_hms_opt(0, 0, 0).map(|midnight| (midnight, sum / count as f64))
        })
        .collect()
}
