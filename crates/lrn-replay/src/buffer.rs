use super::*;
use lrn_core::*;
use std::collections::VecDeque;

/// Capacity-bounded, oldest-first window of samples plus the ingestion cursor.
///
/// Invariants after every public call:
/// - `len() <= max_length()`
/// - removal only at the oldest end, insertion only at the newest end
/// - `cursor()` never moves backwards
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    samples: VecDeque<Sample>,
    max_length: usize,
    cursor: Option<Name>,
}

impl ReplayBuffer {
    pub fn new(max_length: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            max_length,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.max_length
    }
    pub fn max_length(&self) -> usize {
        self.max_length
    }
    /// Newest unit ever ingested.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
    /// The whole window as one slice, oldest first.
    pub fn contiguous(&mut self) -> &[Sample] {
        self.samples.make_contiguous()
    }

    /// Drops up to `k` of the oldest samples. Returns how many were dropped.
    pub fn evict(&mut self, k: usize) -> usize {
        let k = k.min(self.samples.len());
        self.samples.drain(..k);
        k
    }

    /// Appends a batch at the newest end, then trims the oldest end back to capacity.
    pub fn append(&mut self, batch: Batch) {
        self.samples.extend(batch);
        let excess = self.samples.len().saturating_sub(self.max_length);
        self.evict(excess);
    }

    /// Moves the cursor to `unit` if that is newer than where it is.
    pub fn advance(&mut self, unit: &str) {
        if self.cursor.as_deref().map_or(true, |c| unit > c) {
            self.cursor = Some(unit.to_string());
        }
    }

    /// Rebuilds a buffer from persisted parts, keeping the newest samples that fit.
    pub(crate) fn restore(max_length: usize, cursor: Option<Name>, samples: Vec<Sample>) -> Self {
        let mut buffer = Self::new(max_length);
        buffer.append(Batch::from(samples));
        buffer.cursor = cursor;
        buffer
    }
}
