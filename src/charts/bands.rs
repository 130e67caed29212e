use crate::types::thresholds::{ReturnPeriodThresholds, Severity, SeverityBand};
use chrono::NaiveDateTime;

/// Headroom applied above the largest plotted value, both for the y axis and the top band.
pub const Y_HEADROOM: f64 = 1.2;

/// Builds the three return-period bands `[r2, r10)`, `[r10, r20)` and `[r20, 1.2 × max)`.
///
/// Each band spans `start..end`. The top band is always emitted, even when
/// `1.2 × max` lies below `r20` and the band is therefore inverted.
pub fn severity_bands(
    start: NaiveDateTime,
    end: NaiveDateTime,
    thresholds: &ReturnPeriodThresholds,
    max: f64,
) -> [SeverityBand; 3] {
    let band = |lower: f64, upper: f64, severity: Severity| SeverityBand {
        start,
        end,
        lower,
        upper,
        severity,
    };
    [
        band(thresholds.r2, thresholds.r10, Severity::TwoYear),
        band(thresholds.r10, thresholds.r20, Severity::TenYear),
        band(thresholds.r20, max * Y_HEADROOM, Severity::TwentyYear),
    ]
}
