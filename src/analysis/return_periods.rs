use crate::analysis::averages::simulated_flow;
use crate::analysis::error::AnalysisError;
use crate::types::table::TimeSeriesTable;
use chrono::Datelike;
use log::debug;
use std::collections::BTreeMap;

/// Return periods, in years, estimated when the caller has no preference.
pub const DEFAULT_RETURN_PERIODS: [u32; 6] = [2, 5, 10, 25, 50, 100];

/// Estimates return-period flows by fitting a Gumbel Type-I distribution to the
/// annual maxima of a historic simulation.
///
/// For each return period `T` the flow is
/// `-ln(-ln(1 - 1/T)) * s * 0.7797 + mean - 0.45 * s`, where `mean` and `s` are
/// the sample mean and standard deviation of the annual maxima.
///
/// ```no_run
/// # fn run(hist: &geoglows::TimeSeriesTable) -> Result<(), geoglows::GeoglowsError> {
/// use geoglows::{compute_return_periods, ReturnPeriodThresholds, DEFAULT_RETURN_PERIODS};
///
/// let computed = compute_return_periods(hist, &DEFAULT_RETURN_PERIODS)?;
/// let thresholds = ReturnPeriodThresholds::from_computed(&computed)?;
/// # Ok(())
/// # }
/// ```
pub fn compute_return_periods(
    historical: &TimeSeriesTable,
    return_periods: &[u32],
) -> Result<BTreeMap<u32, f64>, AnalysisError> {
    if let Some(&bad) = return_periods.iter().find(|&&t| t < 2) {
        return Err(AnalysisError::InvalidReturnPeriod(bad));
    }

    let annual_maxima = annual_maxima(historical)?;
    let n = annual_maxima.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientYears { years: n });
    }

    let mean = annual_maxima.iter().sum::<f64>() / n as f64;
    let variance = annual_maxima
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let std = variance.sqrt();
    debug!("Fitting Gumbel over {n} annual maxima (mean {mean:.3}, std {std:.3})");

    Ok(return_periods
        .iter()
        .map(|&t| {
            let reduced = -(-(1.0 - 1.0 / t as f64).ln()).ln();
            (t, reduced * std * 0.7797 + mean - 0.45 * std)
        })
        .collect())
}

fn annual_maxima(historical: &TimeSeriesTable) -> Result<Vec<f64>, AnalysisError> {
    let (times, flows) = simulated_flow(historical)?;

    let mut maxima: BTreeMap<i32, f64> = BTreeMap::new();
    for (time, &flow) in times.iter().zip(&flows) {
        maxima
            .entry(time.year())
            .and_modify(|max| *max = max.max(flow))
            .or_insert(flow);
    }
    Ok(maxima.into_values().collect())
}
