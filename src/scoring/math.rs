//! Small numeric helpers shared by every stage.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice.
pub fn population_sd(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Weighted mean over whichever components are present, with the supplied
/// weights renormalised to sum to 1 across the present ones.
///
/// Returns `None` when no component is present or every present component
/// carries zero weight.
pub fn partial_weighted_mean(components: &[(Option<f64>, f64)]) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (value, weight) in components {
        if let Some(v) = value {
            weighted += v * weight;
            total_weight += weight;
        }
    }
    if total_weight <= 0.0 {
        return None;
    }
    Some(weighted / total_weight)
}

/// Round to `places` decimals for presentation fields.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Scale a 0-4 value onto 0-100.
pub fn to_100(value_0_4: f64) -> f64 {
    value_0_4 * 25.0
}
