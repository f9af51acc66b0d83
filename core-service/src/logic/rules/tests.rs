use super::*;
use crate::logic::buffer::SampleBuffer;
use crate::logic::config::PipelineConfig;
use crate::logic::sample::{FieldSample, PlasmaSample, Timestamp};
use crate::logic::scorer::{SeverityClass, SeverityLabel};

/// (speed, density, bz) per sample, times t0000, t0001, ...
fn buffer_from(rows: &[(Option<f64>, Option<f64>, Option<f64>)], offset: usize) -> (Vec<PlasmaSample>, Vec<FieldSample>) {
    let plasma = rows
        .iter()
        .enumerate()
        .map(|(i, (speed, density, _))| PlasmaSample {
            time: Timestamp::new(format!("t{:04}", i + offset)),
            density: *density,
            speed: *speed,
            temperature: Some(1.0e5),
        })
        .collect();
    let field = rows
        .iter()
        .enumerate()
        .map(|(i, (_, _, bz))| FieldSample {
            time: Timestamp::new(format!("t{:04}", i + offset)),
            bx: Some(0.0),
            by: Some(0.0),
            bz: *bz,
        })
        .collect();
    (plasma, field)
}

fn filled(rows: &[(Option<f64>, Option<f64>, Option<f64>)]) -> SampleBuffer {
    let mut buffer = SampleBuffer::new(3000);
    let (plasma, field) = buffer_from(rows, 0);
    buffer.append_batch(&plasma, &field);
    buffer
}

fn engine() -> RuleEngine {
    RuleEngine::new(&PipelineConfig::default())
}

#[test]
fn test_fires_on_triple_condition_without_delta_v() {
    let buffer = filled(&[(Some(600.0), Some(12.0), Some(-12.0))]);
    let mut log = DetectionLog::new(100);

    let created = engine().run(&buffer, &mut log);

    assert_eq!(created.len(), 1);
    let d = &created[0];
    assert_eq!(d.id, "t0000_600");
    assert_eq!(d.delta_v, None);
    assert_eq!(d.intensity, Intensity::Mild);
    assert_eq!(d.forecast_arrival_hours, Some(69));
    assert_eq!(d.dynamic_pressure, Some(7.23));
    assert_eq!(d.bz_integral, 12.0);
    assert_eq!(d.score, 0.12);
    assert_eq!(d.severity_label, SeverityLabel::Nominal);
    assert_eq!(d.severity_class, SeverityClass::Info);
    assert!(!d.anomaly.is_anomaly);
    assert_eq!(log.len(), 1);
}

#[test]
fn test_shock_without_high_speed_or_density_does_not_fire() {
    // deltaV = 450 - 300 = 150, but speed <= 500 and density <= 10
    let mut rows = vec![(Some(300.0), Some(3.0), Some(-2.0))];
    rows.extend((1..30).map(|_| (Some(400.0), Some(3.0), Some(-2.0))));
    rows.push((Some(450.0), Some(3.0), Some(-2.0)));
    let buffer = filled(&rows);

    let conditions = RuleConditions::evaluate(engine().thresholds(), 450.0, 3.0, -2.0, Some(150.0));
    assert!(conditions.shock);
    assert!(!conditions.high_speed && !conditions.high_density && !conditions.south_bz);
    assert!(!conditions.fires());

    assert!(engine().scan(&buffer, &DetectionLog::new(100)).is_empty());
}

#[test]
fn test_shock_with_high_speed_fires() {
    let mut rows = vec![(Some(300.0), Some(3.0), Some(2.0))];
    rows.extend((1..30).map(|_| (Some(400.0), Some(3.0), Some(2.0))));
    rows.push((Some(520.0), Some(3.0), Some(2.0)));
    let buffer = filled(&rows);

    let created = engine().scan(&buffer, &DetectionLog::new(100));

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "t0030_520");
    assert_eq!(created[0].delta_v, Some(220.0));
}

#[test]
fn test_null_fields_are_skipped() {
    let buffer = filled(&[
        (None, Some(12.0), Some(-12.0)),
        (Some(600.0), None, Some(-12.0)),
        (Some(600.0), Some(12.0), None),
    ]);

    assert!(engine().scan(&buffer, &DetectionLog::new(100)).is_empty());
}

#[test]
fn test_rescan_is_idempotent() {
    let rows: Vec<_> = (0..10).map(|_| (Some(700.0), Some(15.0), Some(-20.0))).collect();
    let buffer = filled(&rows);
    let mut log = DetectionLog::new(100);

    assert_eq!(engine().run(&buffer, &mut log).len(), 10);
    assert!(engine().run(&buffer, &mut log).is_empty());
    assert_eq!(log.len(), 10);
}

#[test]
fn test_log_cap_keeps_most_recent() {
    let rows: Vec<_> = (0..150).map(|_| (Some(700.0), Some(15.0), Some(-20.0))).collect();
    let buffer = filled(&rows);
    let mut log = DetectionLog::new(100);

    let created = engine().run(&buffer, &mut log);
    assert_eq!(created.len(), 150);
    assert_eq!(log.len(), 100);

    let ids: Vec<_> = log.snapshot().into_iter().map(|d| d.id).collect();
    assert_eq!(ids.first().map(String::as_str), Some("t0050_700"));
    assert_eq!(ids.last().map(String::as_str), Some("t0149_700"));

    // dropped detections do not come back on rescan
    assert!(engine().run(&buffer, &mut log).is_empty());
    assert_eq!(log.len(), 100);
}

#[test]
fn test_cap_across_batches() {
    let mut buffer = SampleBuffer::new(3000);
    let mut log = DetectionLog::new(100);
    let firing = (Some(700.0), Some(15.0), Some(-20.0));

    let (plasma, field) = buffer_from(&vec![firing; 80], 0);
    buffer.append_batch(&plasma, &field);
    engine().run(&buffer, &mut log);

    let (plasma, field) = buffer_from(&vec![firing; 40], 80);
    buffer.append_batch(&plasma, &field);
    let created = engine().run(&buffer, &mut log);

    assert_eq!(created.len(), 40);
    assert_eq!(log.len(), 100);
    assert_eq!(log.snapshot()[0].id, "t0020_700");
    assert_eq!(log.latest().map(|d| d.id.as_str()), Some("t0119_700"));
}

#[test]
fn test_forget_before_allows_only_buffered_ids() {
    let rows: Vec<_> = (0..3).map(|_| (Some(700.0), Some(15.0), Some(-20.0))).collect();
    let buffer = filled(&rows);
    let mut log = DetectionLog::new(1);
    engine().run(&buffer, &mut log);

    assert!(log.knows("t0000_700"));
    log.forget_before(&Timestamp::new("t0001"));
    assert!(!log.knows("t0000_700"));
    assert!(log.knows("t0001_700"));
    // retained entry is always known
    assert!(log.knows("t0002_700"));
}

#[test]
fn test_intensity_buckets() {
    assert_eq!(Intensity::from_speed(3500.0), Intensity::VeryStrong);
    assert_eq!(Intensity::from_speed(3000.0), Intensity::Strong);
    assert_eq!(Intensity::from_speed(1600.0), Intensity::Strong);
    assert_eq!(Intensity::from_speed(1300.0), Intensity::Moderate);
    assert_eq!(Intensity::from_speed(401.0), Intensity::Mild);
    assert_eq!(Intensity::from_speed(400.0), Intensity::Nominal);
}

#[test]
fn test_arrival_hours() {
    assert_eq!(types::arrival_hours(0.0), None);
    assert_eq!(types::arrival_hours(-5.0), None);
    // 149597870.7 / 400 / 3600 = 103.9
    assert_eq!(types::arrival_hours(400.0), Some(104));
}

#[test]
fn test_detection_json_field_names() {
    let buffer = filled(&[(Some(3200.0), Some(12.0), Some(-12.0))]);
    let created = engine().scan(&buffer, &DetectionLog::new(100));
    let json = serde_json::to_value(&created[0]).unwrap();

    assert_eq!(json["intensity"], "Very Strong");
    assert!(json.get("deltaV").is_some());
    assert!(json.get("forecastArrivalHours").is_some());
    assert!(json.get("bzIntegral").is_some());
    assert_eq!(json["anomaly"]["isAnomaly"], false);
}
