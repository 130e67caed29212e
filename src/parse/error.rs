use crate::types::product::Product;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read CSV payload for {product}")]
    Csv {
        product: Product,
        #[source]
        source: PolarsError,
    },

    #[error("Header for {product} is missing required column '{column}'")]
    MissingColumn { product: Product, column: String },

    #[error("Header for {product} contains unexpected column '{column}'")]
    UnexpectedColumn { product: Product, column: String },

    #[error("Invalid timestamp '{value}' in column '{column}' at row {row}")]
    InvalidTimestamp {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid stream id '{value}' in column '{column}' at row {row}")]
    InvalidStreamId {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid day of year '{value}' in column '{column}' at row {row}")]
    InvalidDayOfYear {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Day of year {day} at row {row} is outside 1..=366 after normalization")]
    DayOfYearOutOfRange { row: usize, day: i64 },

    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Missing index value in column '{column}' at row {row}")]
    MissingIndexValue { column: String, row: usize },

    #[error("Duplicate index value '{value}' in column '{column}'")]
    DuplicateIndex { column: String, value: String },

    #[error("Index column '{column}' is not strictly increasing at row {row}")]
    NotIncreasing { column: String, row: usize },

    #[error("Column '{column}' has {found} values but the index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed building DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
