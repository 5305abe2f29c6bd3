//! Performance scoring.
//!
//! - [`metrics::PerformanceMetrics`] — three clamped scores
//! - [`strategy::ScoringStrategy`] — how scores move after an agent turn
//! - [`report::DebateReport`] — the end-of-debate summary

pub mod metrics;
pub mod report;
pub mod strategy;
