//! Small numeric helpers shared by the aggregator, the views, and the voyage adapter.

/// Round half away from zero to `places` decimals. Display only; never fed back into balances.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Signed rendering used by terminal reports, e.g. `+19.34` / `-5.66`.
pub fn format_signed(value: f64, places: usize) -> String {
    if value >= 0.0 {
        format!("+{:.places$}", value.abs())
    } else {
        format!("{value:.places$}")
    }
}

pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub(crate) fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Strictly positive and finite, as required for voyage distance and fuel mass.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err(format!("{name} must be a finite number"));
    }
    if value <= 0.0 {
        return Err(format!("{name} must be greater than zero (got {value})"));
    }
    Ok(value)
}
