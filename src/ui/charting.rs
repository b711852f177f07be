use crate::time_series::WpmSample;

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[WpmSample], run_secs: u32) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|s| s.wpm).max().unwrap_or(0);
    let last_sample = samples.last().map_or(0, |s| s.elapsed);

    let overall_duration = f64::from(run_secs.max(last_sample).max(1));
    // leave headroom and land on a round number
    let y_max = (f64::from(highest_wpm.max(1)) / 10.0).ceil() * 10.0;

    (overall_duration, y_max)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
