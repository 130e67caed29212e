use crate::series::error::ExtractError;
use crate::types::product::Product;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Expected a {expected} table but got a {found} table")]
    WrongProduct { expected: Product, found: Product },

    #[error("At least two years of simulated flow are needed, found {years}")]
    InsufficientYears { years: usize },

    #[error("Return period must be at least 2 years, got {0}")]
    InvalidReturnPeriod(u32),

    #[error("Rolling window must cover at least one sample, got {0}")]
    InvalidWindow(usize),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
