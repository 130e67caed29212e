use crate::charts::bands::{severity_bands, Y_HEADROOM};
use crate::charts::error::ChartError;
use crate::charts::flow_duration::exceedance_probabilities;
use crate::charts::options::PlotOptions;
use crate::charts::render::ChartOutput;
use crate::series::error::ExtractError;
use crate::series::extractor::{ensemble_column, extract_ensembles, extract_one};
use crate::types::chart_spec::{AxisSpec, ChartKind, ChartSpec, Trace, TraceStyle};
use crate::types::product::{
    Product, COL_HIGH_RES, COL_MAX, COL_MAX_FLOW, COL_MIN, COL_MIN_FLOW, COL_MEAN, COL_STD_LOWER,
    COL_STD_UPPER, COL_STREAMFLOW,
};
use crate::types::series::{NamedSeries, XValues, HIGH_RES_MEMBER};
use crate::types::table::TimeSeriesTable;
use crate::types::thresholds::{ReturnPeriodThresholds, SeverityBand};
use chrono::NaiveDateTime;
use log::debug;
use ordered_float::OrderedFloat;

const Y_TITLE: &str = "Streamflow (m<sup>3</sup>/s)";
const X_TITLE: &str = "Date";

const ENVELOPE_LIGHT: &str = "rgb(152, 251, 152)";
const ENVELOPE_DARK: &str = "rgb(34, 139, 34)";

fn require(table: &TimeSeriesTable, product: Product) -> Result<(), ChartError> {
    if table.product() != product {
        return Err(ChartError::WrongProduct {
            expected: product,
            found: table.product(),
        });
    }
    if table.is_empty() {
        return Err(ChartError::EmptyTable { product });
    }
    Ok(())
}

fn span_of(table: &TimeSeriesTable) -> Result<(NaiveDateTime, NaiveDateTime), ChartError> {
    table.time_span().ok_or(ChartError::EmptyTable {
        product: table.product(),
    })
}

fn trace(table: &TimeSeriesTable, column: &str, label: &str, style: TraceStyle) -> Result<Trace, ChartError> {
    Ok(Trace {
        label: label.to_string(),
        series: extract_one(table, column)?,
        style,
    })
}

fn max_over(traces: &[Trace], kind: ChartKind) -> Result<f64, ChartError> {
    traces
        .iter()
        .filter_map(|t| t.series.max())
        .map(OrderedFloat)
        .max()
        .map(|v| v.0)
        .ok_or(ChartError::NoData(kind))
}

/// The statistics envelope in drawing order: each filled trace fills down to the one before it.
fn envelope_traces(stats: &TimeSeriesTable) -> Result<Vec<Trace>, ChartError> {
    Ok(vec![
        trace(stats, COL_MIN, "Min", TraceStyle::line(ENVELOPE_LIGHT))?,
        trace(
            stats,
            COL_STD_LOWER,
            "Std. Dev. Lower",
            TraceStyle::fill_to_previous(ENVELOPE_LIGHT),
        )?,
        trace(
            stats,
            COL_STD_UPPER,
            "Std. Dev. Upper",
            TraceStyle::fill_to_previous(ENVELOPE_DARK),
        )?,
        trace(stats, COL_MAX, "Max", TraceStyle::fill_to_previous(ENVELOPE_LIGHT))?,
        trace(stats, COL_MEAN, "Mean", TraceStyle::line("blue"))?,
        trace(stats, COL_HIGH_RES, "Higher Resolution", TraceStyle::line("black"))?,
    ])
}

fn assemble(
    kind: ChartKind,
    options: &PlotOptions,
    x_axis: AxisSpec,
    traces: Vec<Trace>,
    bands: impl FnOnce(f64) -> Vec<SeverityBand>,
) -> Result<ChartSpec, ChartError> {
    let max = max_over(&traces, kind)?;
    let spec = ChartSpec {
        kind,
        title: options.title(kind),
        reach_id: options.reach_id,
        drain_area: options.drain_area.clone(),
        x_axis,
        y_axis: AxisSpec::new(Y_TITLE).with_range(0.0, Y_HEADROOM * max),
        traces,
        bands: bands(max),
    };
    debug!(
        "Composed {} chart with {} traces and {} bands",
        kind,
        spec.traces.len(),
        spec.bands.len()
    );
    Ok(spec)
}

/// Recorded first-day flows followed by the current forecast envelope.
///
/// The bands span from the earliest to the latest timestamp of either table.
pub fn hydroviewer_chart(
    records: &TimeSeriesTable,
    stats: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(records, Product::ForecastRecords)?;
    require(stats, Product::ForecastStats)?;
    let (records_start, records_end) = span_of(records)?;
    let (stats_start, stats_end) = span_of(stats)?;
    let start = records_start.min(stats_start);
    let end = records_end.max(stats_end);

    let mut traces = vec![trace(
        records,
        COL_STREAMFLOW,
        "1st day forecasted flows",
        TraceStyle::line("orange"),
    )?];
    traces.extend(envelope_traces(stats)?);

    assemble(ChartKind::Hydroviewer, options, AxisSpec::new(X_TITLE), traces, |max| {
        severity_bands(start, end, thresholds, max).to_vec()
    })
}

pub fn forecast_chart(
    stats: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(stats, Product::ForecastStats)?;
    let (start, end) = span_of(stats)?;
    let traces = envelope_traces(stats)?;
    assemble(ChartKind::Forecast, options, AxisSpec::new(X_TITLE), traces, |max| {
        severity_bands(start, end, thresholds, max).to_vec()
    })
}

pub fn records_chart(
    records: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(records, Product::ForecastRecords)?;
    let (start, end) = span_of(records)?;
    let traces = vec![trace(
        records,
        COL_STREAMFLOW,
        "1st day forecasted flows",
        TraceStyle::line("blue"),
    )?];
    assemble(ChartKind::Records, options, AxisSpec::new(X_TITLE), traces, |max| {
        severity_bands(start, end, thresholds, max).to_vec()
    })
}

/// Every ensemble member: the high-resolution run first, then members 1 to 51.
///
/// # Errors
///
/// [`ExtractError::MissingSeries`] if any of the 52 members is absent.
pub fn ensembles_chart(
    ensembles: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(ensembles, Product::ForecastEnsembles)?;
    let (start, end) = span_of(ensembles)?;
    let mut set = extract_ensembles(ensembles)?;

    let mut take = |index: u8| {
        set.members.remove(&index).ok_or_else(|| ExtractError::MissingSeries {
            column: ensemble_column(index),
        })
    };
    let mut traces = vec![Trace {
        label: "High Resolution".to_string(),
        series: take(HIGH_RES_MEMBER)?,
        style: TraceStyle::line("black"),
    }];
    for index in 1..HIGH_RES_MEMBER {
        traces.push(Trace {
            label: format!("Ensemble {index}"),
            series: take(index)?,
            style: TraceStyle::default(),
        });
    }

    assemble(ChartKind::Ensembles, options, AxisSpec::new(X_TITLE), traces, |max| {
        severity_bands(start, end, thresholds, max).to_vec()
    })
}

pub fn historical_chart(
    historical: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(historical, Product::HistoricSimulation)?;
    let (start, end) = span_of(historical)?;
    let traces = vec![trace(
        historical,
        COL_STREAMFLOW,
        "Historic Simulation",
        TraceStyle::default(),
    )?];
    let x_axis = AxisSpec::new(X_TITLE).with_formats("%b %d %Y", "%Y");
    assemble(ChartKind::Historical, options, x_axis, traces, |max| {
        severity_bands(start, end, thresholds, max).to_vec()
    })
}

/// Maximum, average and minimum flow for each day of the year, without any bands.
pub fn seasonal_chart(
    seasonal: &TimeSeriesTable,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(seasonal, Product::SeasonalAverage)?;
    let traces = vec![
        trace(seasonal, COL_MAX_FLOW, "Maximum Daily Flow", TraceStyle::line("red"))?,
        trace(seasonal, COL_STREAMFLOW, "Average Daily Flow", TraceStyle::line("blue"))?,
        trace(seasonal, COL_MIN_FLOW, "Minimum Daily Flow", TraceStyle::line("black"))?,
    ];
    assemble(ChartKind::Seasonal, options, AxisSpec::new(X_TITLE), traces, |_| Vec::new())
}

pub fn flow_duration_chart(
    historical: &TimeSeriesTable,
    options: &PlotOptions,
) -> Result<ChartSpec, ChartError> {
    require(historical, Product::HistoricSimulation)?;
    let simulated = extract_one(historical, COL_STREAMFLOW)?;
    let (probabilities, flows) = exceedance_probabilities(simulated.y());
    let series = NamedSeries::try_new(COL_STREAMFLOW, XValues::Numeric(probabilities), flows)?;
    let traces = vec![Trace {
        label: "Flow Duration".to_string(),
        series,
        style: TraceStyle::default(),
    }];
    let x_axis = AxisSpec::new("Exceedance Probability");
    assemble(ChartKind::FlowDuration, options, x_axis, traces, |_| Vec::new())
}

pub fn hydroviewer_plot(
    records: &TimeSeriesTable,
    stats: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options
        .output
        .render(&hydroviewer_chart(records, stats, thresholds, options)?)
}

pub fn forecast_plot(
    stats: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options.output.render(&forecast_chart(stats, thresholds, options)?)
}

pub fn records_plot(
    records: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options.output.render(&records_chart(records, thresholds, options)?)
}

pub fn ensembles_plot(
    ensembles: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options
        .output
        .render(&ensembles_chart(ensembles, thresholds, options)?)
}

pub fn historical_plot(
    historical: &TimeSeriesTable,
    thresholds: &ReturnPeriodThresholds,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options
        .output
        .render(&historical_chart(historical, thresholds, options)?)
}

pub fn seasonal_plot(
    seasonal: &TimeSeriesTable,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options.output.render(&seasonal_chart(seasonal, options)?)
}

pub fn flow_duration_curve_plot(
    historical: &TimeSeriesTable,
    options: &PlotOptions,
) -> Result<ChartOutput, ChartError> {
    options.output.render(&flow_duration_chart(historical, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chart_spec::TraceFill;
    use crate::types::day_of_year::DayOfYear;
    use crate::types::output_format::OutputFormat;
    use crate::types::table::{ColumnData, TableIndex};
    use crate::types::thresholds::Severity;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn numeric(name: &str, values: &[f64]) -> (String, ColumnData) {
        (
            name.to_string(),
            ColumnData::Numeric(values.iter().copied().map(Some).collect()),
        )
    }

    fn records(days: &[u32], flows: &[f64]) -> TimeSeriesTable {
        TimeSeriesTable::try_new(
            Product::ForecastRecords,
            TableIndex::Time(days.iter().map(|&d| day(d)).collect()),
            vec![numeric(COL_STREAMFLOW, flows)],
        )
        .unwrap()
    }

    fn stats(days: &[u32], mean: &[f64]) -> TimeSeriesTable {
        let scaled = |f: f64| mean.iter().map(|v| v * f).collect::<Vec<_>>();
        TimeSeriesTable::try_new(
            Product::ForecastStats,
            TableIndex::Time(days.iter().map(|&d| day(d)).collect()),
            vec![
                numeric(COL_MEAN, mean),
                numeric(COL_MAX, &scaled(1.5)),
                numeric(COL_MIN, &scaled(0.5)),
                numeric(COL_STD_LOWER, &scaled(0.8)),
                numeric(COL_STD_UPPER, &scaled(1.2)),
                numeric(COL_HIGH_RES, mean),
            ],
        )
        .unwrap()
    }

    fn thresholds() -> ReturnPeriodThresholds {
        ReturnPeriodThresholds::new(12.0, 20.0, 30.0)
    }

    fn json() -> PlotOptions {
        PlotOptions::builder().output(OutputFormat::Json).build()
    }

    #[test]
    fn records_chart_scales_axis_and_keeps_inverted_top_band() {
        let table = records(&[1, 2], &[10.0, 15.0]);
        let spec = records_chart(&table, &thresholds(), &json()).unwrap();

        assert_eq!(spec.y_axis.range, Some([0.0, 18.0]));
        let bounds: Vec<(f64, f64)> = spec.bands.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(bounds[0], (12.0, 20.0));
        assert_eq!(bounds[1], (20.0, 30.0));
        assert_eq!(bounds[2].0, 30.0);
        assert!((bounds[2].1 - 18.0).abs() < 1e-9);
        assert!(spec.bands.iter().all(|b| b.start == day(1) && b.end == day(2)));
    }

    #[test]
    fn json_output_reports_the_same_range() {
        let table = records(&[1, 2], &[10.0, 15.0]);
        let ChartOutput::Json(value) = records_plot(&table, &thresholds(), &json()).unwrap() else {
            panic!("expected json output");
        };
        assert_eq!(value["y_axis"]["range"][1].as_f64(), Some(18.0));
        assert_eq!(value["bands"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn hydroviewer_spans_both_tables_and_orders_traces() {
        let records = records(&[1, 2, 3], &[4.0, 5.0, 6.0]);
        let stats = stats(&[3, 4, 5], &[6.0, 8.0, 10.0]);
        let spec = hydroviewer_chart(&records, &stats, &thresholds(), &json()).unwrap();

        let labels: Vec<&str> = spec.traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "1st day forecasted flows",
                "Min",
                "Std. Dev. Lower",
                "Std. Dev. Upper",
                "Max",
                "Mean",
                "Higher Resolution",
            ]
        );
        assert_eq!(spec.bands[0].start, day(1));
        assert_eq!(spec.bands[0].end, day(5));
        // max is 1.5 * 10
        assert_eq!(spec.y_max(), Some(18.0));
        assert_eq!(spec.bands[2].severity, Severity::TwentyYear);
    }

    #[test]
    fn forecast_chart_is_the_envelope_only() {
        let stats = stats(&[1, 2, 3], &[10.0, 20.0, 40.0]);
        let spec = forecast_chart(&stats, &thresholds(), &json()).unwrap();

        assert_eq!(spec.kind, ChartKind::Forecast);
        assert_eq!(spec.title, "Forecasted Streamflow");
        let labels: Vec<&str> = spec.traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Min", "Std. Dev. Lower", "Std. Dev. Upper", "Max", "Mean", "Higher Resolution"]
        );
        assert!(spec.trace("1st day forecasted flows").is_none());
        assert_eq!(spec.traces[0].style.fill, TraceFill::None);
        assert!(spec.traces[1..4].iter().all(|t| t.style.fill == TraceFill::ToNextY));

        // max is 1.5 * 40
        assert!((spec.y_max().unwrap() - 72.0).abs() < 1e-9);
        let bounds: Vec<(f64, f64)> = spec.bands.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(&bounds[..2], &[(12.0, 20.0), (20.0, 30.0)]);
        assert_eq!(bounds[2].0, 30.0);
        assert!((bounds[2].1 - 72.0).abs() < 1e-9);
        assert!(spec.bands.iter().all(|b| b.start == day(1) && b.end == day(3)));
    }

    #[test]
    fn historical_chart_has_one_trace_with_year_formats() {
        let table = TimeSeriesTable::try_new(
            Product::HistoricSimulation,
            TableIndex::Time(vec![day(1), day(2), day(3), day(4)]),
            vec![numeric(COL_STREAMFLOW, &[5.0, 25.0, 15.0, 10.0])],
        )
        .unwrap();
        let options = PlotOptions::builder()
            .output(OutputFormat::Json)
            .drain_area("1,200 km^2")
            .build();
        let spec = historical_chart(&table, &thresholds(), &options).unwrap();

        assert_eq!(spec.traces.len(), 1);
        assert_eq!(spec.traces[0].label, "Historic Simulation");
        assert_eq!(spec.traces[0].series.y(), &[5.0, 25.0, 15.0, 10.0]);
        assert_eq!(spec.x_axis.hover_format.as_deref(), Some("%b %d %Y"));
        assert_eq!(spec.x_axis.tick_format.as_deref(), Some("%Y"));
        assert_eq!(
            spec.title,
            "Historic Streamflow Simulation<br>Upstream Drainage Area: 1,200 km^2"
        );
        assert!((spec.y_max().unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(spec.bands[2].lower, 30.0);
        assert!((spec.bands[2].upper - 30.0).abs() < 1e-9);
        assert!(spec.bands.iter().all(|b| b.start == day(1) && b.end == day(4)));
    }

    #[test]
    fn wrong_product_is_rejected() {
        let stats = stats(&[1], &[1.0]);
        assert!(matches!(
            records_chart(&stats, &thresholds(), &json()),
            Err(ChartError::WrongProduct {
                expected: Product::ForecastRecords,
                found: Product::ForecastStats,
            })
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = records(&[], &[]);
        assert!(matches!(
            historical_chart(&table, &thresholds(), &json()),
            Err(ChartError::WrongProduct { .. })
        ));
        assert!(matches!(
            records_chart(&table, &thresholds(), &json()),
            Err(ChartError::EmptyTable { .. })
        ));
    }

    #[test]
    fn seasonal_chart_has_no_bands() {
        let table = TimeSeriesTable::try_new(
            Product::SeasonalAverage,
            TableIndex::DayOfYear((1..=3).filter_map(DayOfYear::new).collect()),
            vec![
                numeric(COL_STREAMFLOW, &[2.0, 3.0, 4.0]),
                numeric(COL_MAX_FLOW, &[5.0, 6.0, 10.0]),
                numeric(COL_MIN_FLOW, &[1.0, 1.0, 1.0]),
            ],
        )
        .unwrap();
        let options = PlotOptions::builder().reach_id(7).build();
        let spec = seasonal_chart(&table, &options).unwrap();

        assert!(spec.bands.is_empty());
        assert_eq!(spec.y_max(), Some(12.0));
        assert_eq!(spec.traces[0].label, "Maximum Daily Flow");
        assert_eq!(
            spec.traces[1].series.x(),
            &XValues::Labels(vec!["Jan 01".into(), "Jan 02".into(), "Jan 03".into()])
        );
        assert_eq!(
            spec.title,
            "Daily Average Streamflow (Historic Simulation)<br>Stream ID: 7"
        );
    }

    #[test]
    fn ensembles_need_every_member() {
        let times: Vec<NaiveDateTime> = vec![day(1), day(2)];
        let mut columns: Vec<(String, ColumnData)> = (1..=52u8)
            .map(|i| {
                (
                    ensemble_column(i),
                    ColumnData::Numeric(vec![Some(i as f64), Some(1.0)]),
                )
            })
            .collect();
        let full = TimeSeriesTable::try_new(
            Product::ForecastEnsembles,
            TableIndex::Time(times.clone()),
            columns.clone(),
        )
        .unwrap();
        let spec = ensembles_chart(&full, &thresholds(), &json()).unwrap();
        assert_eq!(spec.traces.len(), 52);
        assert_eq!(spec.traces[0].label, "High Resolution");
        assert_eq!(spec.traces[0].series.y(), &[52.0, 1.0]);
        assert_eq!(spec.traces[51].label, "Ensemble 51");
        assert!((spec.y_max().unwrap() - 62.4).abs() < 1e-9);

        columns.retain(|(name, _)| name != &ensemble_column(17));
        let partial =
            TimeSeriesTable::try_new(Product::ForecastEnsembles, TableIndex::Time(times), columns)
                .unwrap();
        assert!(matches!(
            ensembles_chart(&partial, &thresholds(), &json()),
            Err(ChartError::Extract(ExtractError::MissingSeries { column }))
                if column == "ensemble_17 (m^3/s)"
        ));
    }

    #[test]
    fn flow_duration_sorts_descending() {
        let table = TimeSeriesTable::try_new(
            Product::HistoricSimulation,
            TableIndex::Time(vec![day(1), day(2), day(3)]),
            vec![numeric(COL_STREAMFLOW, &[1.0, 3.0, 2.0])],
        )
        .unwrap();
        let spec = flow_duration_chart(&table, &json()).unwrap();
        let series = &spec.traces[0].series;
        assert_eq!(series.y(), &[3.0, 2.0, 1.0]);
        assert_eq!(series.x(), &XValues::Numeric(vec![0.25, 0.5, 0.75]));
        assert!(spec.bands.is_empty());
        assert!((spec.y_max().unwrap() - 3.6).abs() < 1e-9);
    }
}
