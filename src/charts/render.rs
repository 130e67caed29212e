//! Turns a [`ChartSpec`] into the representation asked for by [`OutputFormat`].

use crate::charts::error::ChartError;
use crate::types::chart_spec::{AxisSpec, ChartSpec, Trace, TraceFill};
use crate::types::output_format::OutputFormat;
use crate::types::series::XValues;
use chrono::NaiveDateTime;
use plotly::common::{Fill, Line, Mode, Title};
use plotly::layout::{Axis, Shape, ShapeLine, ShapeType};
use plotly::{Configuration, Layout, Plot, Scatter, Trace as PlotlyTrace};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const BAND_OPACITY: f64 = 0.4;

/// A rendered chart.
pub enum ChartOutput {
    /// The serialized [`ChartSpec`].
    Json(Value),
    Plotly(Box<Plot>),
    /// An embeddable `<div>` fragment; plotly.js must already be loaded by the page.
    Html(String),
}

impl fmt::Debug for ChartOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartOutput::Json(value) => f.debug_tuple("Json").field(value).finish(),
            ChartOutput::Plotly(_) => f.write_str("Plotly(..)"),
            ChartOutput::Html(html) => f.debug_tuple("Html").field(&html.len()).finish(),
        }
    }
}

impl OutputFormat {
    pub fn render(&self, spec: &ChartSpec) -> Result<ChartOutput, ChartError> {
        Ok(match self {
            OutputFormat::Json => ChartOutput::Json(serde_json::to_value(spec)?),
            OutputFormat::Plotly => ChartOutput::Plotly(Box::new(to_plot(spec))),
            OutputFormat::PlotlyHtml => {
                let div_id = format!("geoglows-{}", spec.kind);
                ChartOutput::Html(to_plot(spec).to_inline_html(Some(div_id.as_str())))
            }
        })
    }
}

fn axis(spec: &AxisSpec) -> Axis {
    let mut axis = Axis::new().title(Title::with_text(spec.title.as_str()));
    if let Some([low, high]) = spec.range {
        axis = axis.range(vec![low, high]);
    }
    if let Some(format) = &spec.hover_format {
        axis = axis.hover_format(format.as_str());
    }
    if let Some(format) = &spec.tick_format {
        axis = axis.tick_format(format.as_str());
    }
    axis
}

fn styled<X>(x: Vec<X>, trace: &Trace) -> Box<Scatter<X, f64>>
where
    X: Serialize + Clone + 'static,
{
    let mut line = Line::new();
    if let Some(color) = &trace.style.color {
        line = line.color(color.clone());
    }
    if let Some(width) = trace.style.width {
        line = line.width(width);
    }

    let scatter = Scatter::new(x, trace.series.y().to_vec())
        .name(trace.label.as_str())
        .mode(Mode::Lines)
        .line(line);
    match trace.style.fill {
        TraceFill::ToNextY => scatter.fill(Fill::ToNextY),
        TraceFill::None => scatter,
    }
}

fn scatter(trace: &Trace) -> Box<dyn PlotlyTrace> {
    match trace.series.x() {
        XValues::Time(times) => styled(times.iter().map(plotly_time).collect(), trace),
        XValues::Labels(labels) => styled(labels.clone(), trace),
        XValues::Numeric(values) => styled(values.clone(), trace),
    }
}

fn plotly_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Builds a live figure from `spec`. Bands become filled rectangles behind the traces.
pub fn to_plot(spec: &ChartSpec) -> Plot {
    let mut plot = Plot::new();
    for trace in &spec.traces {
        plot.add_trace(scatter(trace));
    }

    let shapes: Vec<Shape> = spec
        .bands
        .iter()
        .map(|band| {
            Shape::new()
                .shape_type(ShapeType::Rect)
                .x_ref("x")
                .y_ref("y")
                .x0(plotly_time(&band.start))
                .x1(plotly_time(&band.end))
                .y0(band.lower)
                .y1(band.upper)
                .line(ShapeLine::new().width(0.0))
                .opacity(BAND_OPACITY)
                .fill_color(band.severity.fill_color())
        })
        .collect();

    let layout = Layout::new()
        .title(Title::with_text(spec.title.as_str()))
        .x_axis(axis(&spec.x_axis))
        .y_axis(axis(&spec.y_axis))
        .shapes(shapes);
    plot.set_layout(layout);
    plot.set_configuration(Configuration::new().autosizable(true).responsive(true));
    plot
}
