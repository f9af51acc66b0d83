//! Sample Buffer - Bounded rolling history of merged samples
//!
//! FIFO ring keyed by timestamp. Plasma and field readings live in the same
//! `Sample`, so eviction can never misalign the two series.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use super::sample::{FieldSample, PlasmaSample, Sample, Timestamp};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

/// Result of one `append_batch`
#[derive(Debug, Clone, Default)]
pub struct AppendOutcome {
    /// Newly stored samples, in order
    pub appended: Vec<Sample>,
    /// Already-buffered samples whose null readings were filled
    pub updated: Vec<Sample>,
    pub skipped: usize,
    pub evicted: usize,
}

/// Buffer status information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub fill_percent: f32,
    pub oldest: Option<Timestamp>,
    pub newest: Option<Timestamp>,
}

// ============================================================================
// BUFFER OPERATIONS
// ============================================================================

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Merge plasma rows with field rows by exact timestamp and store them.
    ///
    /// Plasma rows without a field match get null field readings. A row for
    /// a timestamp already buffered fills that sample's null readings (late
    /// field rows arrive this way); a row bringing nothing new is skipped,
    /// as is anything older than the oldest buffered sample. Timestamps
    /// missing from the middle are inserted in order. Evicts from the front
    /// until `len <= capacity`.
    pub fn append_batch(&mut self, plasma: &[PlasmaSample], field: &[FieldSample]) -> AppendOutcome {
        if plasma.is_empty() || field.is_empty() {
            return AppendOutcome::default();
        }

        let mut by_time: HashMap<&Timestamp, &FieldSample> = HashMap::with_capacity(field.len());
        for row in field {
            by_time.entry(&row.time).or_insert(row);
        }

        let mut outcome = AppendOutcome::default();

        for row in plasma {
            let field_row = by_time.get(&row.time).copied();

            if self.newest().map_or(true, |newest| row.time > *newest) {
                let sample = Sample::merge(row, field_row);
                outcome.appended.push(sample.clone());
                self.samples.push_back(sample);
                continue;
            }

            if self.oldest().is_some_and(|oldest| row.time < *oldest) {
                outcome.skipped += 1;
                continue;
            }

            match self.samples.binary_search_by(|s| s.time.cmp(&row.time)) {
                Ok(i) => {
                    let sample = &mut self.samples[i];
                    if sample.fill_missing(row, field_row) {
                        outcome.updated.push(sample.clone());
                    } else {
                        outcome.skipped += 1;
                    }
                }
                Err(i) => {
                    let sample = Sample::merge(row, field_row);
                    outcome.appended.push(sample.clone());
                    self.samples.insert(i, sample);
                }
            }
        }

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            outcome.evicted += 1;
        }

        if outcome.evicted > 0 {
            log::debug!("Sample buffer evicted {} oldest samples", outcome.evicted);
        }

        outcome
    }

    /// Last `n` samples, oldest first (fewer if the buffer is shorter)
    pub fn tail(&self, n: usize) -> Vec<Sample> {
        self.tail_iter(n).cloned().collect()
    }

    /// Borrowing variant of `tail`
    pub fn tail_iter(&self, n: usize) -> impl Iterator<Item = &Sample> {
        let start = self.samples.len().saturating_sub(n);
        self.samples.range(start..)
    }

    /// Aligned sample at index `i`, `None` when out of range
    pub fn at(&self, i: usize) -> Option<&Sample> {
        self.samples.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&Timestamp> {
        self.samples.front().map(|s| &s.time)
    }

    pub fn newest(&self) -> Option<&Timestamp> {
        self.samples.back().map(|s| &s.time)
    }

    pub fn status(&self) -> BufferStatus {
        BufferStatus {
            current_size: self.samples.len(),
            capacity: self.capacity,
            fill_percent: (self.samples.len() as f32 / self.capacity as f32 * 100.0).min(100.0),
            oldest: self.oldest().cloned(),
            newest: self.newest().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(i: usize) -> Timestamp {
        Timestamp::new(format!("2024-05-10 {:02}:{:02}:00.000", i / 60, i % 60))
    }

    fn plasma(i: usize, speed: f64) -> PlasmaSample {
        PlasmaSample { time: ts(i), density: Some(5.0), speed: Some(speed), temperature: None }
    }

    fn field(i: usize, bz: f64) -> FieldSample {
        FieldSample { time: ts(i), bx: Some(1.0), by: Some(-1.0), bz: Some(bz) }
    }

    #[test]
    fn test_merge_by_exact_timestamp() {
        let mut buffer = SampleBuffer::new(10);
        let plasma_rows = vec![plasma(0, 400.0), plasma(1, 410.0), plasma(2, 420.0)];
        // field row for minute 1 is missing, minute 7 has no plasma partner
        let field_rows = vec![field(0, -3.0), field(2, -5.0), field(7, -9.0)];

        let outcome = buffer.append_batch(&plasma_rows, &field_rows);

        assert_eq!(outcome.appended.len(), 3);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.at(0).unwrap().bz(), Some(-3.0));
        assert_eq!(buffer.at(1).unwrap().bz(), None);
        assert_eq!(buffer.at(1).unwrap().field.bx, None);
        assert_eq!(buffer.at(2).unwrap().bz(), Some(-5.0));
    }

    #[test]
    fn test_empty_input_has_no_effect() {
        let mut buffer = SampleBuffer::new(10);
        buffer.append_batch(&[plasma(0, 400.0)], &[field(0, 1.0)]);

        let outcome = buffer.append_batch(&[plasma(1, 500.0)], &[]);
        assert!(outcome.appended.is_empty());
        let outcome = buffer.append_batch(&[], &[field(1, 1.0)]);
        assert!(outcome.appended.is_empty());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_eviction_keeps_bound_and_alignment() {
        let mut buffer = SampleBuffer::new(5);

        for batch in 0..4 {
            let plasma_rows: Vec<_> = (batch * 3..batch * 3 + 3).map(|i| plasma(i, i as f64)).collect();
            let field_rows: Vec<_> = (batch * 3..batch * 3 + 3).map(|i| field(i, -(i as f64))).collect();
            buffer.append_batch(&plasma_rows, &field_rows);

            assert!(buffer.len() <= 5);
            for sample in buffer.iter() {
                // speed == -bz for every aligned pair
                assert_eq!(sample.speed(), sample.bz().map(|b| -b));
            }
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.oldest(), Some(&ts(7)));
        assert_eq!(buffer.newest(), Some(&ts(11)));
    }

    #[test]
    fn test_overlapping_batches_are_not_duplicated() {
        let mut buffer = SampleBuffer::new(100);
        let rows: Vec<_> = (0..5).map(|i| plasma(i, 400.0)).collect();
        let fields: Vec<_> = (0..5).map(|i| field(i, 0.0)).collect();
        buffer.append_batch(&rows, &fields);

        let rows: Vec<_> = (3..8).map(|i| plasma(i, 400.0)).collect();
        let fields: Vec<_> = (3..8).map(|i| field(i, 0.0)).collect();
        let outcome = buffer.append_batch(&rows, &fields);

        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.appended.len(), 3);
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_late_field_row_fills_buffered_sample() {
        let mut buffer = SampleBuffer::new(100);
        let rows: Vec<_> = (0..4).map(|i| plasma(i, 400.0)).collect();
        // minute 2 field row not published yet
        buffer.append_batch(&rows, &[field(0, 1.0), field(1, 1.0), field(3, 1.0)]);
        assert_eq!(buffer.at(2).unwrap().bz(), None);

        let fields: Vec<_> = (0..4).map(|i| field(i, -12.0)).collect();
        let outcome = buffer.append_batch(&rows, &fields);

        assert!(outcome.appended.is_empty());
        assert_eq!(outcome.updated.len(), 1);
        assert_eq!(outcome.updated[0].time, ts(2));
        assert_eq!(outcome.skipped, 3);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.at(2).unwrap().bz(), Some(-12.0));
        // present readings are not overwritten
        assert_eq!(buffer.at(1).unwrap().bz(), Some(1.0));
    }

    #[test]
    fn test_gap_is_inserted_in_order_and_stale_rows_skipped() {
        let mut buffer = SampleBuffer::new(100);
        let rows = vec![plasma(1, 400.0), plasma(2, 400.0), plasma(4, 400.0)];
        let fields: Vec<_> = (0..5).map(|i| field(i, 0.0)).collect();
        buffer.append_batch(&rows, &fields);

        let outcome = buffer.append_batch(&[plasma(0, 400.0), plasma(3, 420.0)], &fields);

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.appended.len(), 1);
        let times: Vec<_> = buffer.iter().map(|s| s.time.clone()).collect();
        assert_eq!(times, vec![ts(1), ts(2), ts(3), ts(4)]);
        assert_eq!(buffer.at(2).unwrap().speed(), Some(420.0));
    }

    #[test]
    fn test_tail_and_at() {
        let mut buffer = SampleBuffer::new(10);
        let rows: Vec<_> = (0..4).map(|i| plasma(i, 100.0 * i as f64)).collect();
        let fields: Vec<_> = (0..4).map(|i| field(i, 0.0)).collect();
        buffer.append_batch(&rows, &fields);

        assert!(buffer.tail(0).is_empty());
        assert_eq!(buffer.tail(2).len(), 2);
        assert_eq!(buffer.tail(2)[0].speed(), Some(200.0));
        assert_eq!(buffer.tail(50).len(), 4);
        assert!(buffer.at(4).is_none());
        assert_eq!(buffer.at(3).unwrap().speed(), Some(300.0));
    }

    #[test]
    fn test_status() {
        let mut buffer = SampleBuffer::new(4);
        assert_eq!(buffer.status().fill_percent, 0.0);
        buffer.append_batch(&[plasma(0, 1.0), plasma(1, 1.0)], &[field(0, 0.0)]);

        let status = buffer.status();
        assert_eq!(status.current_size, 2);
        assert_eq!(status.fill_percent, 50.0);
        assert_eq!(status.newest, Some(ts(1)));
    }
}
