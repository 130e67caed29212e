use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateReachError {
    #[error("Point ({lat}, {lon}) is not within any of the supported delineation regions")]
    OutsideRegions { lat: f64, lon: f64 },

    #[error("Failed to read reach points for region '{region}'")]
    Csv {
        region: String,
        #[source]
        source: PolarsError,
    },

    #[error("Reach point CSV for region '{region}' has no '{column}' column")]
    MissingColumn { region: String, column: &'static str },

    #[error("Reach point CSV for region '{region}' has an empty value in row {row}")]
    MissingValue { region: String, row: usize },
}
