//! Performance metrics value object

use serde::{Deserialize, Serialize};

/// Upper bound of every metric
pub const METRIC_MAX: u8 = 100;

/// Three bounded performance scores, each in `[0, 100]`
///
/// The only ways to build or change one clamp, so no sequence of deltas can
/// push a score out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    logic: u8,
    rhetoric: u8,
    evidence: u8,
}

/// Signed adjustments applied to [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricDeltas {
    pub logic: i32,
    pub rhetoric: i32,
    pub evidence: i32,
}

impl PerformanceMetrics {
    pub fn new(logic: u8, rhetoric: u8, evidence: u8) -> Self {
        Self {
            logic: logic.min(METRIC_MAX),
            rhetoric: rhetoric.min(METRIC_MAX),
            evidence: evidence.min(METRIC_MAX),
        }
    }

    pub fn logic(&self) -> u8 {
        self.logic
    }

    pub fn rhetoric(&self) -> u8 {
        self.rhetoric
    }

    pub fn evidence(&self) -> u8 {
        self.evidence
    }

    /// Apply deltas and clamp each score to `[0, 100]`
    pub fn apply(&self, deltas: MetricDeltas) -> Self {
        Self {
            logic: clamp_add(self.logic, deltas.logic),
            rhetoric: clamp_add(self.rhetoric, deltas.rhetoric),
            evidence: clamp_add(self.evidence, deltas.evidence),
        }
    }

    /// Rounded mean of the three scores
    pub fn overall(&self) -> u8 {
        let sum = u32::from(self.logic) + u32::from(self.rhetoric) + u32::from(self.evidence);
        ((sum + 1) / 3) as u8
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new(68, 59, 59)
    }
}

fn clamp_add(value: u8, delta: i32) -> u8 {
    (i32::from(value).saturating_add(delta)).clamp(0, i32::from(METRIC_MAX)) as u8
}
