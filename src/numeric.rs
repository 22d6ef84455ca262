//! Clipping and rounding applied to sampled columns

/// Constrain `x` to [lower, upper]
pub fn clip(x: f64, lower: f64, upper: f64) -> f64 {
    x.max(lower).min(upper)
}

pub fn clip_all(values: Vec<f64>, lower: f64, upper: f64) -> Vec<f64> {
    values.into_iter().map(|x| clip(x, lower, upper)).collect()
}

/// Clip then truncate toward zero, as when a float column is cast to
/// integers after clipping.
pub fn clip_truncate(values: Vec<f64>, lower: f64, upper: f64) -> Vec<i64> {
    values
        .into_iter()
        .map(|x| clip(x, lower, upper).trunc() as i64)
        .collect()
}

/// Round to a number of decimal places, with ties going to the even
/// neighbour of the scaled value (so 0.125 rounds to 0.12).
pub fn round_to(x: f64, decimals: i32) -> f64 {
    if decimals == 0 {
        return x.round_ties_even();
    }
    let factor = 10f64.powi(decimals);
    (x * factor).round_ties_even() / factor
}
