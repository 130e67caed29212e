//! Blocking client for the GEOGloWS streamflow prediction REST API.

use crate::client::error::ClientError;
use crate::client::regions::reach_to_region;
use crate::parse::parser::{parse_response_with, ParseOptions};
use crate::types::output_format::ReturnFormat;
use crate::types::product::Product;
use crate::types::table::TimeSeriesTable;
use bon::bon;
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default API endpoint.
pub const BYU_ENDPOINT: &str = "https://tethys2.byu.edu/localsptapi/api/";
/// Endpoint serving forecast ensembles.
pub const AZURE_HOST: &str = "http://gsf-api-vm.eastus.cloudapp.azure.com/api/";

/// Reanalysis dataset driving the historic simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Forcing {
    #[default]
    EraInterim,
    Era5,
}

impl Forcing {
    fn query_value(&self) -> &'static str {
        match self {
            Forcing::EraInterim => "era_interim",
            Forcing::Era5 => "era_5",
        }
    }
}

impl FromStr for Forcing {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "era_interim" => Ok(Forcing::EraInterim),
            "era_5" => Ok(Forcing::Era5),
            _ => Err(ClientError::UnknownForcing(s.to_string())),
        }
    }
}

impl fmt::Display for Forcing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

/// A response in the representation selected by [`ReturnFormat`].
#[derive(Debug)]
pub enum ApiResponse {
    Table(TimeSeriesTable),
    Json(Value),
    WaterMl(String),
    /// The untouched HTTP response, status already checked.
    Request(Response),
    Url(String),
}

impl ApiResponse {
    pub fn into_table(self) -> Option<TimeSeriesTable> {
        match self {
            ApiResponse::Table(table) => Some(table),
            _ => None,
        }
    }
}

type Params = Vec<(&'static str, String)>;

/// Client for the streamflow prediction service.
///
/// No responses are cached; every call performs one request.
///
/// ```no_run
/// # use geoglows::{GeoglowsError, StreamflowClient};
/// # fn run() -> Result<(), GeoglowsError> {
/// let client = StreamflowClient::builder().build()?;
/// let stats = client
///     .forecast_stats()
///     .reach_id(9007292)
///     .call()?
///     .into_table();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamflowClient {
    http: Client,
    endpoint: String,
    ensemble_endpoint: String,
    parse_options: ParseOptions,
}

fn with_trailing_slash(mut endpoint: String) -> String {
    if !endpoint.ends_with('/') {
        endpoint.push('/');
    }
    endpoint
}

#[bon]
impl StreamflowClient {
    /// `endpoint` serves every product except the ensembles, which come from
    /// `ensemble_endpoint`.
    #[builder]
    pub fn new(
        #[builder(into, default = BYU_ENDPOINT.to_string())] endpoint: String,
        #[builder(into, default = AZURE_HOST.to_string())] ensemble_endpoint: String,
        timeout: Option<Duration>,
        #[builder(default)] parse_options: ParseOptions,
    ) -> Result<Self, ClientError> {
        let mut http = Client::builder().gzip(true);
        if let Some(timeout) = timeout {
            http = http.timeout(timeout);
        }
        Ok(Self {
            http: http.build().map_err(ClientError::ClientBuild)?,
            endpoint: with_trailing_slash(endpoint),
            ensemble_endpoint: with_trailing_slash(ensemble_endpoint),
            parse_options,
        })
    }

    /// Statistics of the latest forecast.
    #[builder]
    pub fn forecast_stats(
        &self,
        reach_id: i64,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::ForecastStats,
            vec![("reach_id", reach_id.to_string())],
            return_format,
        )
    }

    /// Every member of the latest forecast ensemble.
    #[builder]
    pub fn forecast_ensembles(
        &self,
        reach_id: i64,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::ForecastEnsembles,
            vec![("reach_id", reach_id.to_string())],
            return_format,
        )
    }

    /// Streams of `region` likely to reach a return-period flow.
    #[builder]
    pub fn forecast_warnings(
        &self,
        #[builder(into)] region: String,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::ForecastWarnings,
            vec![("region", region)],
            return_format,
        )
    }

    #[builder]
    pub fn forecast_records(
        &self,
        reach_id: i64,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::ForecastRecords,
            vec![("reach_id", reach_id.to_string())],
            return_format,
        )
    }

    #[builder]
    pub fn historic_simulation(
        &self,
        reach_id: i64,
        #[builder(default)] forcing: Forcing,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::HistoricSimulation,
            Self::forced(reach_id, forcing),
            return_format,
        )
    }

    #[builder]
    pub fn seasonal_average(
        &self,
        reach_id: i64,
        #[builder(default)] forcing: Forcing,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::SeasonalAverage,
            Self::forced(reach_id, forcing),
            return_format,
        )
    }

    #[builder]
    pub fn return_periods(
        &self,
        reach_id: i64,
        #[builder(default)] forcing: Forcing,
        #[builder(default)] return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        self.fetch(
            Product::ReturnPeriods,
            Self::forced(reach_id, forcing),
            return_format,
        )
    }

    /// Regions and dates with stored forecasts.
    pub fn available_data(&self) -> Result<Value, ClientError> {
        self.fetch_json("AvailableData/", Vec::new())
    }

    pub fn available_regions(&self) -> Result<Value, ClientError> {
        self.fetch_json("AvailableRegions/", Vec::new())
    }

    /// Dates of the stored forecasts for a region. The region is resolved from
    /// `reach_id` when not given directly.
    #[builder]
    pub fn available_dates(
        &self,
        reach_id: Option<i64>,
        #[builder(into)] region: Option<String>,
    ) -> Result<Value, ClientError> {
        let region = region
            .or_else(|| reach_id.and_then(reach_to_region).map(str::to_string))
            .ok_or(ClientError::MissingRegion)?;
        self.fetch_json("AvailableData/", vec![("region", region)])
    }
}

impl StreamflowClient {
    fn forced(reach_id: i64, forcing: Forcing) -> Params {
        vec![
            ("reach_id", reach_id.to_string()),
            ("forcing", forcing.query_value().to_string()),
        ]
    }

    fn endpoint_for(&self, product: Product) -> &str {
        match product {
            Product::ForecastEnsembles => &self.ensemble_endpoint,
            _ => &self.endpoint,
        }
    }

    fn request_url(&self, endpoint: &str, method: &str, params: &Params) -> Result<String, ClientError> {
        let url = format!("{endpoint}{method}");
        self.http
            .get(&url)
            .query(params)
            .build()
            .map(|request| request.url().to_string())
            .map_err(|e| ClientError::NetworkRequest(url, e))
    }

    fn send(&self, endpoint: &str, method: &str, params: &Params) -> Result<Response, ClientError> {
        let url = self.request_url(endpoint, method, params)?;
        info!("Requesting {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ClientError::NetworkRequest(url.clone(), e))?;

        match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                Err(if let Some(status) = e.status() {
                    ClientError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ClientError::NetworkRequest(url, e)
                })
            }
        }
    }

    fn fetch(
        &self,
        product: Product,
        mut params: Params,
        return_format: ReturnFormat,
    ) -> Result<ApiResponse, ClientError> {
        let endpoint = self.endpoint_for(product);
        let method = product.method_path();
        params.push(("return_format", return_format.query_value().to_string()));

        if return_format == ReturnFormat::Url {
            return Ok(ApiResponse::Url(self.request_url(endpoint, method, &params)?));
        }

        let response = self.send(endpoint, method, &params)?;
        let url = response.url().to_string();
        Ok(match return_format {
            ReturnFormat::Csv => {
                let body = response
                    .bytes()
                    .map_err(|e| ClientError::ResponseBody(url, e))?;
                ApiResponse::Table(parse_response_with(product, &body, &self.parse_options)?)
            }
            ReturnFormat::Json => {
                ApiResponse::Json(response.json().map_err(|e| ClientError::ResponseBody(url, e))?)
            }
            ReturnFormat::WaterMl => {
                ApiResponse::WaterMl(response.text().map_err(|e| ClientError::ResponseBody(url, e))?)
            }
            ReturnFormat::Request | ReturnFormat::Url => ApiResponse::Request(response),
        })
    }

    fn fetch_json(&self, method: &str, mut params: Params) -> Result<Value, ClientError> {
        params.push(("return_format", "json".to_string()));
        let response = self.send(&self.endpoint, method, &params)?;
        let url = response.url().to_string();
        response
            .json()
            .map_err(|e| ClientError::ResponseBody(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StreamflowClient {
        StreamflowClient::builder().build().unwrap()
    }

    #[test]
    fn url_format_does_not_send() {
        let response = client()
            .forecast_stats()
            .reach_id(9007292)
            .return_format(ReturnFormat::Url)
            .call()
            .unwrap();
        match response {
            ApiResponse::Url(url) => assert_eq!(
                url,
                "https://tethys2.byu.edu/localsptapi/api/ForecastStats/?reach_id=9007292&return_format=csv"
            ),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn ensembles_use_their_own_endpoint() {
        let response = client()
            .forecast_ensembles()
            .reach_id(1)
            .return_format(ReturnFormat::Url)
            .call()
            .unwrap();
        let ApiResponse::Url(url) = response else {
            panic!("expected url");
        };
        assert!(url.starts_with(AZURE_HOST));
    }

    #[test]
    fn forcing_is_forwarded() {
        let client = StreamflowClient::builder()
            .endpoint("http://localhost:8080/api")
            .build()
            .unwrap();
        let ApiResponse::Url(url) = client
            .historic_simulation()
            .reach_id(42)
            .forcing(Forcing::Era5)
            .return_format(ReturnFormat::Url)
            .call()
            .unwrap()
        else {
            panic!("expected url");
        };
        assert_eq!(
            url,
            "http://localhost:8080/api/HistoricSimulation/?reach_id=42&forcing=era_5&return_format=csv"
        );
    }

    #[test]
    fn available_dates_needs_a_region() {
        let result = client().available_dates().reach_id(99_000_000).call();
        assert!(matches!(result, Err(ClientError::MissingRegion)));
    }

    #[test]
    fn forcing_parses() {
        assert_eq!("ERA_5".parse::<Forcing>().unwrap(), Forcing::Era5);
        assert!(matches!(
            "era_6".parse::<Forcing>(),
            Err(ClientError::UnknownForcing(_))
        ));
    }
}
