//! Online metric sequences and the predictor used to forecast them

use std::collections::VecDeque;

use crate::config::DEFAULT_SEQUENCE_CAPACITY;

/// Bounded sequence of the most recent samples of one metric
#[derive(Debug, Clone)]
pub struct MetricSequence {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl MetricSequence {
    /// Create a sequence keeping at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full
    pub fn add(&mut self, value: f64) {
        debug_assert!(value.is_finite(), "non-finite metric sample {value}");
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample was recorded yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Max number of retained samples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Retained samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Arithmetic mean, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Population standard deviation, 0 when empty
    pub fn std_dev(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .samples
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.samples.len() as f64;
        variance.sqrt()
    }
}

impl Default for MetricSequence {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENCE_CAPACITY)
    }
}

/// Forecasts the next value of a metric from its recent samples
///
/// The forecast is `mean + confidence_factor * std_dev`, a pessimistic
/// estimate that collapses to the mean when the samples agree.
#[derive(Debug, Clone, Copy)]
pub struct Predictor {
    confidence_factor: f64,
}

impl Predictor {
    /// Create a predictor with the given confidence factor
    pub fn new(confidence_factor: f64) -> Self {
        Self { confidence_factor }
    }

    /// Confidence factor
    pub fn confidence_factor(&self) -> f64 {
        self.confidence_factor
    }

    /// Predict the next value, 0 when the sequence is empty
    pub fn predict(&self, seq: &MetricSequence) -> f64 {
        if seq.is_empty() {
            return 0.0;
        }
        seq.mean() + self.confidence_factor * seq.std_dev()
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(0.5)
    }
}
