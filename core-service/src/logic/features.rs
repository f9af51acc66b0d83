//! Feature Derivation - Per-sample derived quantities
//!
//! - `delta_v`: speed jump over a lookback window (shock indicator)
//! - `dynamic_pressure`: k · n · v² in nPa
//! - `bz_integral`: accumulated southward Bz over a trailing window

use super::buffer::SampleBuffer;
use crate::constants::DYNAMIC_PRESSURE_K;

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `speed[i] - speed[i - window]`, `None` without a usable lookback sample
pub fn delta_v(buffer: &SampleBuffer, i: usize, window: usize) -> Option<f64> {
    let back = i.checked_sub(window)?;
    let current = buffer.at(i)?.speed()?;
    let previous = buffer.at(back)?.speed()?;
    Some(current - previous)
}

/// Dynamic pressure in nPa, rounded to 2 decimals
pub fn dynamic_pressure(density: Option<f64>, speed: Option<f64>) -> Option<f64> {
    let (density, speed) = (density?, speed?);
    Some(round2(DYNAMIC_PRESSURE_K * density * speed * speed))
}

/// Sum of `max(0, -bz)` over `[i - window + 1, i]`, skipping nulls
pub fn bz_integral(buffer: &SampleBuffer, i: usize, window: usize) -> f64 {
    if buffer.is_empty() || window == 0 {
        return 0.0;
    }

    let end = i.min(buffer.len() - 1);
    let start = (i + 1).saturating_sub(window);

    let total: f64 = (start..=end)
        .filter_map(|j| buffer.at(j)?.bz())
        .map(|bz| (-bz).max(0.0))
        .sum();

    round2(total)
}
