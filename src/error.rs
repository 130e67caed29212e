use crate::analysis::error::AnalysisError;
use crate::charts::error::{ChartError, ConfigurationError};
use crate::client::error::ClientError;
use crate::exceedance::error::ExceedanceError;
use crate::parse::error::ParseError;
use crate::reaches::error::LocateReachError;
use crate::series::error::ExtractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoglowsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Exceedance(#[from] ExceedanceError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    LocateReach(#[from] LocateReachError),
}
