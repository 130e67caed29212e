//! Fetches the latest forecast for a reach and opens the hydroviewer chart,
//! with the ensemble exceedance table printed below it.
//!
//! To run this demo:
//! cargo run --example hydroviewer --features demos

use std::error::Error;

use geoglows::{
    hydroviewer_plot, probabilities_table, ChartOutput, OutputFormat, PlotOptions,
    ReturnPeriodThresholds, StreamflowClient,
};

const REACH_ID: i64 = 9007292;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Fetching streamflow data for reach {REACH_ID}...");
    let client = StreamflowClient::builder().build()?;

    let missing = |product: &str| format!("{product} did not return a table");
    let stats = client
        .forecast_stats()
        .reach_id(REACH_ID)
        .call()?
        .into_table()
        .ok_or_else(|| missing("ForecastStats"))?;
    let records = client
        .forecast_records()
        .reach_id(REACH_ID)
        .call()?
        .into_table()
        .ok_or_else(|| missing("ForecastRecords"))?;
    let ensembles = client
        .forecast_ensembles()
        .reach_id(REACH_ID)
        .call()?
        .into_table()
        .ok_or_else(|| missing("ForecastEnsembles"))?;
    let rperiods = client
        .return_periods()
        .reach_id(REACH_ID)
        .call()?
        .into_table()
        .ok_or_else(|| missing("ReturnPeriods"))?;

    let thresholds = ReturnPeriodThresholds::from_table(&rperiods)?;
    let options = PlotOptions::builder()
        .output(OutputFormat::Plotly)
        .reach_id(REACH_ID)
        .build();

    if let ChartOutput::Plotly(plot) = hydroviewer_plot(&records, &stats, &thresholds, &options)? {
        println!("Opening hydroviewer in the browser.");
        plot.show();
    }

    println!("{}", probabilities_table(&stats, &ensembles, &thresholds)?);
    Ok(())
}
