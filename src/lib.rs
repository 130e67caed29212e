mod analysis;
mod charts;
mod client;
mod error;
mod exceedance;
mod parse;
mod reaches;
mod series;
mod types;

pub use error::GeoglowsError;

pub use parse::parser::{parse_response, parse_response_with, ParseOptions};
pub use series::extractor::{ensemble_column, extract_ensembles, extract_series, parse_ensemble_column};

pub use charts::bands::{severity_bands, Y_HEADROOM};
pub use charts::composer::*;
pub use charts::flow_duration::exceedance_probabilities;
pub use charts::options::PlotOptions;
pub use charts::render::{to_plot, ChartOutput};

pub use exceedance::builder::{exceedance_table, probabilities_table};
pub use analysis::anomaly::{compute_anomaly, COL_ANOMALY};
pub use analysis::averages::{compute_daily_average, compute_monthly_average};
pub use analysis::return_periods::{compute_return_periods, DEFAULT_RETURN_PERIODS};

pub use client::regions::reach_to_region;
pub use client::streamflow_client::{ApiResponse, Forcing, StreamflowClient, AZURE_HOST, BYU_ENDPOINT};
pub use reaches::locate_reach::{ReachLocator, MAX_REACH_DISTANCE_DEGREES};

pub use types::chart_spec::*;
pub use types::day_of_year::{DayOfYear, DayOfYearBase};
pub use types::exceedance::{ExceedanceRow, ExceedanceTable};
pub use types::month_day::MonthDay;
pub use types::output_format::{OutputFormat, ReturnFormat};
pub use types::product::*;
pub use types::reach::*;
pub use types::series::*;
pub use types::table::{ColumnData, TableIndex, TimeSeriesTable};
pub use types::thresholds::{ReturnPeriodThresholds, Severity, SeverityBand};

pub use analysis::error::AnalysisError;
pub use charts::error::{ChartError, ConfigurationError};
pub use client::error::ClientError;
pub use exceedance::error::ExceedanceError;
pub use parse::error::ParseError;
pub use reaches::error::LocateReachError;
pub use series::error::ExtractError;
