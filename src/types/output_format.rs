//! Selectors for the representation of chart output and API responses.

use crate::charts::error::ConfigurationError;
use crate::client::error::ClientError;
use std::fmt;
use std::str::FromStr;

/// Which representation a chart entry point returns.
///
/// ```
/// use geoglows::OutputFormat;
///
/// assert_eq!("plotly_html".parse::<OutputFormat>().unwrap(), OutputFormat::PlotlyHtml);
/// assert!("xml".parse::<OutputFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// The serialized chart description.
    Json,
    /// A live `plotly` figure.
    #[default]
    Plotly,
    /// A `<div>` fragment that expects plotly.js to be loaded by the page.
    PlotlyHtml,
}

impl OutputFormat {
    fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Plotly => "plotly",
            OutputFormat::PlotlyHtml => "plotly_html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "plotly" => Ok(OutputFormat::Plotly),
            "plotly_html" => Ok(OutputFormat::PlotlyHtml),
            _ => Err(ConfigurationError::InvalidOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The form in which the streamflow API is asked to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnFormat {
    /// CSV, parsed into a [`crate::TimeSeriesTable`].
    #[default]
    Csv,
    /// JSON, returned as a generic value.
    Json,
    /// WaterML, returned as raw text.
    WaterMl,
    /// The raw HTTP response.
    Request,
    /// Only the URL of the request; nothing is sent.
    Url,
}

impl ReturnFormat {
    /// Value of the `return_format` query parameter.
    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            ReturnFormat::Csv | ReturnFormat::Request | ReturnFormat::Url => "csv",
            ReturnFormat::Json => "json",
            ReturnFormat::WaterMl => "waterml",
        }
    }
}

impl FromStr for ReturnFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReturnFormat::Csv),
            "json" => Ok(ReturnFormat::Json),
            "waterml" => Ok(ReturnFormat::WaterMl),
            "request" => Ok(ReturnFormat::Request),
            "url" => Ok(ReturnFormat::Url),
            _ => Err(ClientError::UnsupportedReturnFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("Plotly".parse::<OutputFormat>(), Ok(OutputFormat::Plotly));
        assert_eq!(OutputFormat::default(), OutputFormat::Plotly);
    }

    #[test]
    fn unknown_output_format_is_a_configuration_error() {
        assert_eq!(
            "xml".parse::<OutputFormat>(),
            Err(ConfigurationError::InvalidOutputFormat("xml".to_string()))
        );
    }

    #[test]
    fn return_format_closed_set() {
        assert_eq!("waterml".parse::<ReturnFormat>().unwrap(), ReturnFormat::WaterMl);
        assert_eq!("url".parse::<ReturnFormat>().unwrap(), ReturnFormat::Url);
        assert!(matches!(
            "xls".parse::<ReturnFormat>(),
            Err(ClientError::UnsupportedReturnFormat(f)) if f == "xls"
        ));
        assert_eq!(ReturnFormat::Request.query_value(), "csv");
    }
}
