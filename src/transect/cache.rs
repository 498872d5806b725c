//! Bounded cache of transect batch results
//!
//! Large point batches (whole data grids) are re-projected onto the same
//! transect every time a display redraws. The cache keeps the last few
//! results keyed by the exact input batch, the transect points and the
//! cross-track limit, and evicts the oldest entry when full.

use std::collections::VecDeque;

use crate::coordinates::{same_points, DisplayPoint, GeographicPoint};

/// One cached batch result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The batch that was projected
    pub input: Vec<GeographicPoint>,
    /// Transect points at the time of projection
    pub line: Vec<GeographicPoint>,
    /// Cross-track limit used, in kilometers
    pub max_cross_track: f64,
    /// Projected result
    pub output: Vec<DisplayPoint>,
}

impl CacheEntry {
    fn matches(&self, input: &[GeographicPoint], line: &[GeographicPoint], max: f64) -> bool {
        self.max_cross_track.to_bits() == max.to_bits()
            && same_points(&self.line, line)
            && same_points(&self.input, input)
    }
}

/// Fixed-capacity, oldest-first result cache
#[derive(Debug, Clone)]
pub struct ResultCache {
    capacity: usize,
    entries: VecDeque<CacheEntry>,
}

impl ResultCache {
    /// Creates an empty cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ResultCache {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Looks up a previous result for the same batch, transect and limit
    pub fn get(
        &self,
        input: &[GeographicPoint],
        line: &[GeographicPoint],
        max_cross_track: f64,
    ) -> Option<&[DisplayPoint]> {
        self.entries
            .iter()
            .find(|e| e.matches(input, line, max_cross_track))
            .map(|e| e.output.as_slice())
    }

    /// Stores a result, evicting the oldest entry when full
    pub fn insert(&mut self, entry: CacheEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.entries.clear();
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

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter()
    }
}
