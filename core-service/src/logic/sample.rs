//! Sample records
//!
//! `PlasmaSample` and `FieldSample` are parsed from one upstream row each.
//! The buffer stores them merged into a single `Sample` keyed by timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream timestamp text, compared exactly as delivered.
///
/// The provider emits fixed-width ISO-8601 text, so lexicographic order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One plasma row. `None` marks a missing or unparsable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasmaSample {
    pub time: Timestamp,
    pub density: Option<f64>,
    pub speed: Option<f64>,
    pub temperature: Option<f64>,
}

/// One magnetic-field row (GSM components, nT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    pub time: Timestamp,
    pub bx: Option<f64>,
    pub by: Option<f64>,
    pub bz: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlasmaReading {
    pub density: Option<f64>,
    pub speed: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldReading {
    pub bx: Option<f64>,
    pub by: Option<f64>,
    pub bz: Option<f64>,
}

/// Plasma and field readings for one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: Timestamp,
    pub plasma: PlasmaReading,
    pub field: FieldReading,
}

impl Sample {
    /// Merge a plasma row with its matching field row (or nulls)
    pub fn merge(plasma: &PlasmaSample, field: Option<&FieldSample>) -> Self {
        Self {
            time: plasma.time.clone(),
            plasma: PlasmaReading {
                density: plasma.density,
                speed: plasma.speed,
                temperature: plasma.temperature,
            },
            field: field
                .map(|f| FieldReading { bx: f.bx, by: f.by, bz: f.bz })
                .unwrap_or_default(),
        }
    }

    /// Fill null readings from a re-delivered row pair. Present values are
    /// kept. Returns whether anything changed.
    pub fn fill_missing(&mut self, plasma: &PlasmaSample, field: Option<&FieldSample>) -> bool {
        let mut changed = fill(&mut self.plasma.density, plasma.density);
        changed |= fill(&mut self.plasma.speed, plasma.speed);
        changed |= fill(&mut self.plasma.temperature, plasma.temperature);
        if let Some(f) = field {
            changed |= fill(&mut self.field.bx, f.bx);
            changed |= fill(&mut self.field.by, f.by);
            changed |= fill(&mut self.field.bz, f.bz);
        }
        changed
    }

    pub fn speed(&self) -> Option<f64> {
        self.plasma.speed
    }

    pub fn density(&self) -> Option<f64> {
        self.plasma.density
    }

    pub fn bz(&self) -> Option<f64> {
        self.field.bz
    }

    /// Split back into the two upstream row shapes
    pub fn split(&self) -> (PlasmaSample, FieldSample) {
        (
            PlasmaSample {
                time: self.time.clone(),
                density: self.plasma.density,
                speed: self.plasma.speed,
                temperature: self.plasma.temperature,
            },
            FieldSample {
                time: self.time.clone(),
                bx: self.field.bx,
                by: self.field.by,
                bz: self.field.bz,
            },
        )
    }
}

fn fill(slot: &mut Option<f64>, value: Option<f64>) -> bool {
    match (*slot, value) {
        (None, Some(v)) => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}
