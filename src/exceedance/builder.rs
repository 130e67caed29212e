use crate::exceedance::error::ExceedanceError;
use crate::series::extractor::extract_ensembles;
use crate::types::exceedance::{ExceedanceRow, ExceedanceTable};
use crate::types::product::Product;
use crate::types::series::{NamedSeries, XValues, ENSEMBLE_MEMBER_COUNT};
use crate::types::table::TimeSeriesTable;
use crate::types::thresholds::ReturnPeriodThresholds;
use chrono::{Duration, NaiveDateTime};
use log::debug;

fn require(table: &TimeSeriesTable, product: Product) -> Result<(), ExceedanceError> {
    if table.product() != product {
        return Err(ExceedanceError::WrongProduct {
            expected: product,
            found: table.product(),
        });
    }
    Ok(())
}

/// Highest threshold level (0 = none, 1 = r2, 2 = r10, 3 = r20) a member
/// strictly exceeds anywhere in `[from, to)`.
fn member_level(
    member: &NamedSeries,
    from: NaiveDateTime,
    to: NaiveDateTime,
    thresholds: &ReturnPeriodThresholds,
) -> u8 {
    let XValues::Time(times) = member.x() else {
        return 0;
    };
    times
        .iter()
        .zip(member.y())
        .filter(|(t, _)| **t >= from && **t < to)
        .map(|(_, &flow)| {
            if flow > thresholds.r20 {
                3
            } else if flow > thresholds.r10 {
                2
            } else if flow > thresholds.r2 {
                1
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

fn percent(count: usize) -> u8 {
    (count as f64 * 100.0 / ENSEMBLE_MEMBER_COUNT as f64).round() as u8
}

/// Per-day percentage of ensemble members exceeding each return-period threshold.
///
/// One row per calendar day from the first to the last timestamp of `stats`.
/// Day `i` covers `[day_i 00:00, day_i+1 00:00)`. A member counted at the 20-year
/// level is also counted at the 10 and 2-year levels, so the percentages never
/// increase with severity. Percentages are relative to the full ensemble of 52.
pub fn exceedance_table(
    stats: &TimeSeriesTable,
    ensembles: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
) -> Result<ExceedanceTable, ExceedanceError> {
    require(stats, Product::ForecastStats)?;
    require(ensembles, Product::ForecastEnsembles)?;
    let (first, last) = stats.time_span().ok_or(ExceedanceError::InvalidSpan)?;
    let members = extract_ensembles(ensembles)?;

    let first_day = first.date();
    let last_day = last.date();
    let day_count = (last_day - first_day).num_days() + 1;

    let rows = (0..day_count)
        .map(|offset| {
            let day = first_day + Duration::days(offset);
            let from = day.and_time(chrono::NaiveTime::MIN);
            let to = from + Duration::days(1);

            let mut counts = [0usize; 3];
            for member in members.members.values() {
                let level = member_level(member, from, to, thresholds) as usize;
                for count in counts.iter_mut().take(level) {
                    *count += 1;
                }
            }
            ExceedanceRow {
                day: day.format("%b %d").to_string(),
                percent_2yr: percent(counts[0]),
                percent_10yr: percent(counts[1]),
                percent_20yr: percent(counts[2]),
            }
        })
        .collect::<Vec<_>>();

    debug!("Built exceedance table over {} days", rows.len());
    Ok(ExceedanceTable { rows })
}

/// [`exceedance_table`] rendered as HTML markup.
pub fn probabilities_table(
    stats: &TimeSeriesTable,
    ensembles: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
) -> Result<String, ExceedanceError> {
    Ok(exceedance_table(stats, ensembles, thresholds)?.to_html())
}
