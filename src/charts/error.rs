use crate::series::error::ExtractError;
use crate::types::chart_spec::ChartKind;
use crate::types::product::Product;
use thiserror::Error;

/// Raised when an output selector is not one of the supported representations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid output format '{0}', expected one of: json, plotly, plotly_html")]
    InvalidOutputFormat(String),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Expected a {expected} table but got a {found} table")]
    WrongProduct { expected: Product, found: Product },

    #[error("The {product} table has no rows")]
    EmptyTable { product: Product },

    #[error("No values to plot for the {0} chart")]
    NoData(ChartKind),

    #[error("Return period table has no value for '{column}'")]
    MissingThreshold { column: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to serialize chart")]
    Serialize(#[from] serde_json::Error),
}
