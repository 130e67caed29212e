use crate::series::error::ExtractError;
use crate::types::product::Product;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExceedanceError {
    #[error("Expected a {expected} table but got a {found} table")]
    WrongProduct { expected: Product, found: Product },

    #[error("Forecast statistics have no time span to build daily windows from")]
    InvalidSpan,

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
