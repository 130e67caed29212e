use crate::types::chart_spec::ChartKind;
use crate::types::output_format::OutputFormat;
use bon::Builder;

/// Presentation options shared by every chart entry point.
///
/// ```
/// use geoglows::{OutputFormat, PlotOptions};
///
/// let options = PlotOptions::builder()
///     .output(OutputFormat::Json)
///     .reach_id(9007292)
///     .drain_area("1,234 km²")
///     .build();
/// assert_eq!(options.reach_id, Some(9007292));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct PlotOptions {
    #[builder(default)]
    pub output: OutputFormat,
    /// Appended to the title as `Stream ID: ...`.
    pub reach_id: Option<i64>,
    /// Appended to the title as `Upstream Drainage Area: ...`.
    #[builder(into)]
    pub drain_area: Option<String>,
}

impl PlotOptions {
    pub(crate) fn title(&self, kind: ChartKind) -> String {
        let mut title = kind.base_title().to_string();
        if let Some(reach_id) = self.reach_id {
            title.push_str(&format!("<br>Stream ID: {reach_id}"));
        }
        if let Some(area) = &self.drain_area {
            title.push_str(&format!("<br>Upstream Drainage Area: {area}"));
        }
        title
    }
}
