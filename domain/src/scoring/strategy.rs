//! Pluggable scoring strategies
//!
//! The engine calls a [`ScoringStrategy`] after every agent turn. The default
//! is [`RandomDeltaScoring`], a heuristic that nudges each score by a small
//! bounded random amount. Closures with the right signature are strategies
//! too, which is handy for deterministic tests.

use super::metrics::{MetricDeltas, PerformanceMetrics};
use crate::session::entities::Turn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// `(prior metrics, new turn) -> new metrics`
pub trait ScoringStrategy: Send {
    fn score(&mut self, prior: &PerformanceMetrics, turn: &Turn) -> PerformanceMetrics;
}

impl<F> ScoringStrategy for F
where
    F: FnMut(&PerformanceMetrics, &Turn) -> PerformanceMetrics + Send,
{
    fn score(&mut self, prior: &PerformanceMetrics, turn: &Turn) -> PerformanceMetrics {
        self(prior, turn)
    }
}

/// Inclusive delta ranges, one per metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRanges {
    pub logic: RangeInclusive<i32>,
    pub rhetoric: RangeInclusive<i32>,
    pub evidence: RangeInclusive<i32>,
}

impl Default for DeltaRanges {
    fn default() -> Self {
        Self {
            logic: -2..=2,
            rhetoric: -1..=3,
            evidence: -2..=2,
        }
    }
}

/// Heuristic scoring: bounded random deltas, then clamp
pub struct RandomDeltaScoring {
    rng: StdRng,
    ranges: DeltaRanges,
}

impl RandomDeltaScoring {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            ranges: DeltaRanges::default(),
        }
    }

    pub fn with_ranges(mut self, ranges: DeltaRanges) -> Self {
        assert!(
            !ranges.logic.is_empty() && !ranges.rhetoric.is_empty() && !ranges.evidence.is_empty(),
            "delta ranges must not be empty"
        );
        self.ranges = ranges;
        self
    }

    pub fn ranges(&self) -> &DeltaRanges {
        &self.ranges
    }
}

impl Default for RandomDeltaScoring {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringStrategy for RandomDeltaScoring {
    fn score(&mut self, prior: &PerformanceMetrics, _turn: &Turn) -> PerformanceMetrics {
        let deltas = MetricDeltas {
            logic: self.rng.random_range(self.ranges.logic.clone()),
            rhetoric: self.rng.random_range(self.ranges.rhetoric.clone()),
            evidence: self.rng.random_range(self.ranges.evidence.clone()),
        };
        prior.apply(deltas)
    }
}
