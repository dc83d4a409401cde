use serde::{Deserialize, Serialize};

/// Append-only per-frame values keyed by frame index
///
/// Indices are strictly increasing; there is one entry per consumed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> TimeSeries<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends the value of frame `index`
    ///
    /// `index` must be greater than every index already present.
    pub fn push(&mut self, index: usize, value: T) {
        debug_assert!(
            self.indices.last().is_none_or(|&last| index > last),
            "frame {} appended out of order",
            index
        );
        self.indices.push(index);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn first(&self) -> Option<(usize, &T)> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<(usize, &T)> {
        self.indices.last().copied().zip(self.values.last())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.indices.iter().copied().zip(self.values.iter())
    }

    /// Values from frame `index` onwards, e.g. the stationary tail of a run
    pub fn since(&self, index: usize) -> &[T] {
        let start = self.indices.partition_point(|&i| i < index);
        &self.values[start..]
    }

    /// Applies `f` to every value, keeping the indices
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> TimeSeries<U> {
        TimeSeries {
            indices: self.indices.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }
}
