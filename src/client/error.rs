use crate::parse::error::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unsupported return format requested: '{0}'")]
    UnsupportedReturnFormat(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Specify a region or a reach id that maps to a known region")]
    MissingRegion,

    #[error("Unknown forcing '{0}', expected era_interim or era_5")]
    UnknownForcing(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
