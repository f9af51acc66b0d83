//! Rule evaluation and detection construction

use std::collections::HashSet;

use super::log::DetectionLog;
use super::types::{arrival_hours, Detection, Intensity};
use crate::logic::anomaly;
use crate::logic::buffer::SampleBuffer;
use crate::logic::config::{PipelineConfig, RuleThresholds};
use crate::logic::features;
use crate::logic::sample::Timestamp;
use crate::logic::scorer;

/// The four boolean inputs of the candidate rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConditions {
    pub high_speed: bool,
    pub high_density: bool,
    pub south_bz: bool,
    pub shock: bool,
}

impl RuleConditions {
    pub fn evaluate(
        thresholds: &RuleThresholds,
        speed: f64,
        density: f64,
        bz: f64,
        delta_v: Option<f64>,
    ) -> Self {
        Self {
            high_speed: speed > thresholds.speed_high,
            high_density: density > thresholds.density_high,
            south_bz: bz < thresholds.bz_south,
            shock: delta_v.is_some_and(|dv| dv > thresholds.delta_v_min),
        }
    }

    pub fn fires(&self) -> bool {
        (self.shock && (self.high_speed || self.high_density))
            || (self.high_speed && self.high_density && self.south_bz)
    }
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    thresholds: RuleThresholds,
    delta_window: usize,
    bz_window: usize,
}

impl RuleEngine {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            delta_window: config.delta_window,
            bz_window: config.bz_window,
        }
    }

    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    pub fn delta_window(&self) -> usize {
        self.delta_window
    }

    /// Scan the whole buffer, record new detections in `log` and return them.
    ///
    /// Idempotent: a second run over an unchanged buffer returns nothing.
    pub fn run(&self, buffer: &SampleBuffer, log: &mut DetectionLog) -> Vec<Detection> {
        let created = self.scan(buffer, log);
        if !created.is_empty() {
            log.record(created.clone());
        }
        created
    }

    /// Candidates not yet known to `log`, in buffer order
    pub fn scan(&self, buffer: &SampleBuffer, log: &DetectionLog) -> Vec<Detection> {
        let mut created = Vec::new();
        let mut seen_this_scan = HashSet::new();

        for i in 0..buffer.len() {
            let Some(sample) = buffer.at(i) else { continue };
            let (Some(speed), Some(density), Some(bz)) = (sample.speed(), sample.density(), sample.bz()) else {
                continue;
            };

            let delta_v = features::delta_v(buffer, i, self.delta_window);
            let conditions = RuleConditions::evaluate(&self.thresholds, speed, density, bz, delta_v);
            if !conditions.fires() {
                continue;
            }

            let id = Detection::make_id(&sample.time, speed);
            if log.knows(&id) || !seen_this_scan.insert(id.clone()) {
                continue;
            }

            let candidate = Candidate { index: i, id, time: sample.time.clone(), speed, density, bz, delta_v };
            created.push(self.build_detection(buffer, candidate));
        }

        created
    }

    fn build_detection(&self, buffer: &SampleBuffer, c: Candidate) -> Detection {
        let card = scorer::score(c.speed, c.density, c.bz, c.delta_v);

        Detection {
            forecast_arrival_hours: arrival_hours(c.speed),
            intensity: Intensity::from_speed(c.speed),
            dynamic_pressure: features::dynamic_pressure(Some(c.density), Some(c.speed)),
            bz_integral: features::bz_integral(buffer, c.index, self.bz_window),
            score: card.score,
            severity_label: card.severity_label,
            severity_class: card.severity_class,
            anomaly: anomaly::evaluate(buffer, c.index),
            id: c.id,
            time: c.time,
            speed: c.speed,
            density: c.density,
            bz: c.bz,
            delta_v: c.delta_v,
        }
    }
}

/// A fired, not-yet-known sample
struct Candidate {
    index: usize,
    id: String,
    time: Timestamp,
    speed: f64,
    density: f64,
    bz: f64,
    delta_v: Option<f64>,
}
