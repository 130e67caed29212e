//! The renderer-independent description of a chart.

use crate::types::series::NamedSeries;
use crate::types::thresholds::SeverityBand;
use serde::Serialize;
use std::fmt;

/// The chart types that can be composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Recorded flows together with the current forecast envelope.
    Hydroviewer,
    /// Forecast envelope, mean and high-res run.
    Forecast,
    /// First-day flows of previous forecasts.
    Records,
    /// Every ensemble member.
    Ensembles,
    /// Historic simulation.
    Historical,
    /// Average, maximum and minimum flow per day of the year.
    Seasonal,
    /// Flow against exceedance probability.
    FlowDuration,
}

impl ChartKind {
    pub fn base_title(&self) -> &'static str {
        match self {
            ChartKind::Hydroviewer | ChartKind::Forecast => "Forecasted Streamflow",
            ChartKind::Records => "Previously Forecasted Streamflow",
            ChartKind::Ensembles => "Ensemble Predicted Streamflow",
            ChartKind::Historical => "Historic Streamflow Simulation",
            ChartKind::Seasonal => "Daily Average Streamflow (Historic Simulation)",
            ChartKind::FlowDuration => "Flow Duration Curve",
        }
    }

    pub(crate) fn slug(&self) -> &'static str {
        match self {
            ChartKind::Hydroviewer => "hydroviewer",
            ChartKind::Forecast => "forecast",
            ChartKind::Records => "records",
            ChartKind::Ensembles => "ensembles",
            ChartKind::Historical => "historical",
            ChartKind::Seasonal => "seasonal",
            ChartKind::FlowDuration => "flow-duration",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    /// `[low, high]`; `None` lets the renderer pick.
    pub range: Option<[f64; 2]>,
    pub hover_format: Option<String>,
    pub tick_format: Option<String>,
}

impl AxisSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            range: None,
            hover_format: None,
            tick_format: None,
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some([low, high]);
        self
    }

    pub fn with_formats(mut self, hover: &str, tick: &str) -> Self {
        self.hover_format = Some(hover.to_string());
        self.tick_format = Some(tick.to_string());
        self
    }
}

/// How the area under a trace is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceFill {
    #[default]
    None,
    /// Fill down to the previous trace.
    ToNextY,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TraceStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub fill: TraceFill,
}

impl TraceStyle {
    pub fn line(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// An invisible edge that fills down to the previous trace.
    pub fn fill_to_previous(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            width: Some(0.0),
            fill: TraceFill::ToNextY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub label: String,
    pub series: NamedSeries,
    pub style: TraceStyle,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub reach_id: Option<i64>,
    pub drain_area: Option<String>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    /// Drawn in order; fills refer to the trace before them.
    pub traces: Vec<Trace>,
    pub bands: Vec<SeverityBand>,
}

impl ChartSpec {
    /// Upper end of the y axis.
    pub fn y_max(&self) -> Option<f64> {
        self.y_axis.range.map(|[_, high]| high)
    }

    pub fn trace(&self, label: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.label == label)
    }
}
