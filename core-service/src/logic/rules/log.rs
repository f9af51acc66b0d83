//! Detection Log - Capped in-memory history of detections
//!
//! Retains the most recent `capacity` detections (oldest dropped first).
//! Ids stay remembered while their sample is still buffered, so a rescan
//! cannot re-create a detection the cap has already dropped.

use std::collections::{HashMap, VecDeque};

use super::types::Detection;
use crate::logic::sample::Timestamp;

#[derive(Debug, Clone)]
pub struct DetectionLog {
    entries: VecDeque<Detection>,
    capacity: usize,
    emitted: HashMap<String, Timestamp>,
}

impl DetectionLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            emitted: HashMap::new(),
        }
    }

    /// True if `id` is retained or was emitted for a still-buffered sample
    pub fn knows(&self, id: &str) -> bool {
        self.emitted.contains_key(id) || self.entries.iter().any(|d| d.id == id)
    }

    /// Append in creation order, then truncate to the newest `capacity`
    pub fn record(&mut self, created: Vec<Detection>) {
        for detection in created {
            self.emitted.insert(detection.id.clone(), detection.time.clone());
            self.entries.push_back(detection);
        }

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Drop remembered ids for samples older than `oldest`
    pub fn forget_before(&mut self, oldest: &Timestamp) {
        self.emitted.retain(|_, time| *time >= *oldest);
    }

    /// Full retained log, oldest first
    pub fn snapshot(&self) -> Vec<Detection> {
        self.entries.iter().cloned().collect()
    }

    /// Up to `n` most recent detections, newest first
    pub fn newest_first(&self, n: usize) -> Vec<Detection> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Detection> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn latest(&self) -> Option<&Detection> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
