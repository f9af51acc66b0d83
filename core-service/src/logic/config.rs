//! Pipeline configuration
//!
//! Static at process start. Every field has a default in `constants`;
//! `from_env` applies overrides, falling back to the default on parse failure.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::constants::*;

/// CME candidate rule thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleThresholds {
    pub speed_high: f64,
    pub density_high: f64,
    pub bz_south: f64,
    pub delta_v_min: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            speed_high: DEFAULT_SPEED_HIGH,
            density_high: DEFAULT_DENSITY_HIGH,
            bz_south: DEFAULT_BZ_SOUTH,
            delta_v_min: DEFAULT_DELTA_V_MIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Rolling buffer size (samples)
    pub buffer_capacity: usize,

    /// Retained detections
    pub log_capacity: usize,

    /// deltaV lookback (samples)
    pub delta_window: usize,

    /// Bz integral window (samples)
    pub bz_window: usize,

    pub forecast_alpha: f64,
    pub forecast_steps: usize,

    pub thresholds: RuleThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            log_capacity: DEFAULT_LOG_CAPACITY,
            delta_window: DEFAULT_DELTA_WINDOW,
            bz_window: DEFAULT_BZ_WINDOW,
            forecast_alpha: DEFAULT_FORECAST_ALPHA,
            forecast_steps: DEFAULT_FORECAST_STEPS,
            thresholds: RuleThresholds::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            buffer_capacity: env_or("SW_BUFFER_CAPACITY", defaults.buffer_capacity).max(1),
            log_capacity: defaults.log_capacity,
            delta_window: env_or("SW_DELTA_WINDOW", defaults.delta_window).max(1),
            bz_window: env_or("SW_BZ_WINDOW", defaults.bz_window).max(1),
            forecast_alpha: env_or("SW_FORECAST_ALPHA", defaults.forecast_alpha),
            forecast_steps: env_or("SW_FORECAST_STEPS", defaults.forecast_steps),
            thresholds: RuleThresholds {
                speed_high: env_or("SW_SPEED_HIGH", defaults.thresholds.speed_high),
                density_high: env_or("SW_DENSITY_HIGH", defaults.thresholds.density_high),
                bz_south: env_or("SW_BZ_SOUTH", defaults.thresholds.bz_south),
                delta_v_min: env_or("SW_DELTA_V_MIN", defaults.thresholds.delta_v_min),
            },
        };

        if !(0.0..=1.0).contains(&config.forecast_alpha) {
            log::warn!(
                "SW_FORECAST_ALPHA={} outside [0, 1], using {}",
                config.forecast_alpha,
                DEFAULT_FORECAST_ALPHA
            );
            return Self { forecast_alpha: DEFAULT_FORECAST_ALPHA, ..config };
        }

        config
    }
}

/// Read `key` from the environment, falling back to `default`
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.buffer_capacity, 3000);
        assert_eq!(config.log_capacity, 100);
        assert_eq!(config.delta_window, 30);
        assert_eq!(config.forecast_steps, 6);
        assert_eq!(config.thresholds.speed_high, 500.0);
        assert_eq!(config.thresholds.bz_south, -10.0);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("SW_TEST_GARBAGE_VALUE", "not-a-number");
        assert_eq!(env_or("SW_TEST_GARBAGE_VALUE", 42usize), 42);
        env::remove_var("SW_TEST_GARBAGE_VALUE");
    }

    #[test]
    fn test_env_or_reads_override() {
        env::set_var("SW_TEST_OVERRIDE_VALUE", " 750.5 ");
        assert_eq!(env_or("SW_TEST_OVERRIDE_VALUE", 0.0f64), 750.5);
        env::remove_var("SW_TEST_OVERRIDE_VALUE");
    }
}
