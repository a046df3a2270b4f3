// core/src/stats.rs

// --- RoundTo (public, used by acwr.rs and the tests) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// Arithmetic mean. `None` for an empty slice.
#[inline]
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().copied().sum::<f64>() / xs.len() as f64)
    }
}

/// Population variance (divides by n).
pub fn variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    let sum_sq = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    Some(sum_sq / xs.len() as f64)
}

/// Nearest 0.5 step (6.3 -> 6.5, 6.2 -> 6.0).
#[inline]
pub fn round_half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

/// Clamp that also maps NaN/inf to `lo`.
#[inline]
pub fn clamp_finite(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_finite() { x.clamp(lo, hi) } else { lo }
}
