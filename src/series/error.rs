use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Required series column '{column}' not found in table")]
    MissingSeries { column: String },

    #[error(
        "Column '{column}' does not follow the ensemble naming convention 'ensemble_NN (m^3/s)' with NN in 01..=52"
    )]
    InvalidEnsembleColumn { column: String },

    #[error("Series '{name}' has {x_len} x values but {y_len} y values")]
    LengthMismatch {
        name: String,
        x_len: usize,
        y_len: usize,
    },
}
