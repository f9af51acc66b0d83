//! Background polling of the upstream feed

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use solarwatch_core::{Pipeline, SampleSource};

/// Poll every `period`. The first tick fires immediately; a failed cycle is
/// simply retried on the next tick.
pub fn spawn(pipeline: Arc<Pipeline>, source: Arc<dyn SampleSource>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Polling upstream every {}s", period.as_secs());

        loop {
            ticker.tick().await;

            if let Ok(report) = pipeline.poll(source.as_ref()).await {
                tracing::debug!(
                    "Poll cycle: {} appended, {} new detections",
                    report.appended,
                    report.new_detections.len()
                );
            }
        }
    })
}
