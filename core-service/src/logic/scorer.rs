//! Scorer - Continuous risk score and discrete severity buckets
//!
//! Each feature is mapped linearly onto [0, 1] and clamped, then combined
//! with fixed weights.

use serde::{Deserialize, Serialize};

use super::features::round2;

// ============================================================================
// NORMALIZATION RANGES
// ============================================================================

const SPEED_FLOOR: f64 = 400.0;
const SPEED_CEIL: f64 = 2000.0;
const DENSITY_FLOOR: f64 = 2.0;
const DENSITY_CEIL: f64 = 50.0;
const BZ_SCALE: f64 = 50.0;
const DELTA_V_SCALE: f64 = 500.0;

// ============================================================================
// WEIGHTS
// ============================================================================

const SPEED_WEIGHT: f64 = 0.35;
const DELTA_V_WEIGHT: f64 = 0.30;
const DENSITY_WEIGHT: f64 = 0.20;
const BZ_WEIGHT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLabel {
    Strong,
    Moderate,
    Mild,
    Nominal,
}

impl SeverityLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.75 {
            Self::Strong
        } else if score > 0.5 {
            Self::Moderate
        } else if score > 0.25 {
            Self::Mild
        } else {
            Self::Nominal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Mild => "Mild",
            Self::Nominal => "Nominal",
        }
    }
}

/// Display tier, on its own scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    Critical,
    Warning,
    Info,
}

impl SeverityClass {
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            Self::Critical
        } else if score > 0.3 {
            Self::Warning
        } else {
            Self::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub score: f64,
    pub severity_label: SeverityLabel,
    pub severity_class: SeverityClass,
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Risk score in [0, 1], rounded to 2 decimals
pub fn risk_score(speed: f64, density: f64, bz: f64, delta_v: Option<f64>) -> f64 {
    let speed_norm = clamp01((speed - SPEED_FLOOR) / (SPEED_CEIL - SPEED_FLOOR));
    let density_norm = clamp01((density - DENSITY_FLOOR) / (DENSITY_CEIL - DENSITY_FLOOR));
    let bz_norm = if bz < 0.0 { clamp01(-bz / BZ_SCALE) } else { 0.0 };
    let delta_v_norm = delta_v.map(|dv| clamp01(dv / DELTA_V_SCALE)).unwrap_or(0.0);

    let raw = SPEED_WEIGHT * speed_norm
        + DELTA_V_WEIGHT * delta_v_norm
        + DENSITY_WEIGHT * density_norm
        + BZ_WEIGHT * bz_norm;

    round2(clamp01(raw))
}

pub fn score(speed: f64, density: f64, bz: f64, delta_v: Option<f64>) -> ScoreCard {
    let score = risk_score(speed, density, bz, delta_v);
    ScoreCard {
        score,
        severity_label: SeverityLabel::from_score(score),
        severity_class: SeverityClass::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wind_scores_zero() {
        let card = score(350.0, 1.0, 5.0, None);
        assert_eq!(card.score, 0.0);
        assert_eq!(card.severity_label, SeverityLabel::Nominal);
        assert_eq!(card.severity_class, SeverityClass::Info);
    }

    #[test]
    fn test_saturated_inputs_score_one() {
        let card = score(2500.0, 80.0, -60.0, Some(900.0));
        assert_eq!(card.score, 1.0);
        assert_eq!(card.severity_label, SeverityLabel::Strong);
        assert_eq!(card.severity_class, SeverityClass::Critical);
    }

    #[test]
    fn test_weighted_combination() {
        // speed 1200 → 0.5, density 26 → 0.5, bz -25 → 0.5, dv 250 → 0.5
        let card = score(1200.0, 26.0, -25.0, Some(250.0));
        assert_eq!(card.score, 0.5);
        assert_eq!(card.severity_label, SeverityLabel::Mild);
        assert_eq!(card.severity_class, SeverityClass::Warning);
    }

    #[test]
    fn test_negative_delta_v_contributes_nothing() {
        assert_eq!(risk_score(800.0, 10.0, -10.0, Some(-200.0)), risk_score(800.0, 10.0, -10.0, None));
    }

    #[test]
    fn test_monotonic_in_each_feature() {
        let steps: Vec<f64> = (0..60).map(|i| i as f64).collect();

        let mut last = 0.0;
        for &s in &steps {
            let v = risk_score(300.0 + s * 40.0, 10.0, -5.0, Some(50.0));
            assert!(v >= last);
            last = v;
        }

        let mut last = 0.0;
        for &s in &steps {
            let v = risk_score(600.0, s, -5.0, Some(50.0));
            assert!(v >= last);
            last = v;
        }

        let mut last = 0.0;
        for &s in &steps {
            let v = risk_score(600.0, 10.0, 5.0 - s, Some(50.0));
            assert!(v >= last);
            last = v;
        }

        let mut last = 0.0;
        for &s in &steps {
            let v = risk_score(600.0, 10.0, -5.0, Some(-100.0 + s * 15.0));
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_label_and_class_boundaries() {
        assert_eq!(SeverityLabel::from_score(0.76), SeverityLabel::Strong);
        assert_eq!(SeverityLabel::from_score(0.75), SeverityLabel::Moderate);
        assert_eq!(SeverityLabel::from_score(0.5), SeverityLabel::Mild);
        assert_eq!(SeverityLabel::from_score(0.25), SeverityLabel::Nominal);
        assert_eq!(SeverityClass::from_score(0.61), SeverityClass::Critical);
        assert_eq!(SeverityClass::from_score(0.6), SeverityClass::Warning);
        assert_eq!(SeverityClass::from_score(0.3), SeverityClass::Info);
    }
}
