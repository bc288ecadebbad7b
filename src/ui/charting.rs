use crate::time_series::WpmSample;

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[WpmSample]) -> (f64, f64) {
    let highest_wpm = samples
        .iter()
        .flat_map(|s| [s.raw_wpm, s.wpm])
        .fold(0.0_f64, f64::max);

    let overall_duration = samples.last().map_or(1.0, |s| s.t as f64).max(1.0);

    (overall_duration, highest_wpm.ceil())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
