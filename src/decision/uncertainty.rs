//! Trend-divergence uncertainty signal

/// Uncertainty as divergence between the farm's own income trend and the
/// population's
///
/// Both inputs are percent-change rates. The absolute difference is
/// normalized by the sum of magnitudes, bounding the signal to [0, 1]: 0 when
/// the farm's experience tracks the regional trend exactly (including the
/// case where both are flat), approaching 1 when the trends point apart.
pub fn divergence(personal_change: f64, regional_change: f64) -> f64 {
    let denom = personal_change.abs() + regional_change.abs();
    if denom == 0.0 {
        return 0.0;
    }
    (personal_change - regional_change).abs() / denom
}
