//! End-of-debate report

use super::metrics::PerformanceMetrics;
use serde::Serialize;

/// Score at or above which a category counts as a strength
const STRENGTH_THRESHOLD: u8 = 70;
/// Score below which a category counts as a weakness
const WEAKNESS_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Logic,
    Rhetoric,
    Evidence,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Logic => "Logic",
            Category::Rhetoric => "Rhetoric",
            Category::Evidence => "Evidence",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Logic => "Structure and validity of your reasoning",
            Category::Rhetoric => "Persuasiveness and delivery of your arguments",
            Category::Evidence => "Support for your claims with facts and examples",
        }
    }

    fn strength(&self) -> &'static str {
        match self {
            Category::Logic => "Strong logical structure",
            Category::Rhetoric => "Persuasive, well-delivered arguments",
            Category::Evidence => "Claims well supported by evidence",
        }
    }

    fn improvement(&self) -> &'static str {
        match self {
            Category::Logic => "Lay out your premises before drawing conclusions",
            Category::Rhetoric => "Try using more rhetorical questions",
            Category::Evidence => "Consider adding statistical evidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Strength,
    Weakness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPoint {
    pub kind: FeedbackKind,
    pub text: String,
}

/// Summary shown when a debate concludes or ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateReport {
    pub topic: String,
    pub opponent: String,
    pub rounds_completed: u32,
    pub round_count: u32,
    /// Overall score as a percentage
    pub overall: u8,
    pub categories: Vec<CategoryScore>,
    pub feedback: Vec<FeedbackPoint>,
}

impl DebateReport {
    pub fn build(
        topic: impl Into<String>,
        opponent: impl Into<String>,
        rounds_completed: u32,
        round_count: u32,
        metrics: &PerformanceMetrics,
    ) -> Self {
        let categories = vec![
            CategoryScore {
                category: Category::Logic,
                score: metrics.logic(),
            },
            CategoryScore {
                category: Category::Rhetoric,
                score: metrics.rhetoric(),
            },
            CategoryScore {
                category: Category::Evidence,
                score: metrics.evidence(),
            },
        ];

        let feedback = categories
            .iter()
            .filter_map(|c| {
                if c.score >= STRENGTH_THRESHOLD {
                    Some(FeedbackPoint {
                        kind: FeedbackKind::Strength,
                        text: c.category.strength().to_string(),
                    })
                } else if c.score < WEAKNESS_THRESHOLD {
                    Some(FeedbackPoint {
                        kind: FeedbackKind::Weakness,
                        text: c.category.improvement().to_string(),
                    })
                } else {
                    None
                }
            })
            .collect();

        Self {
            topic: topic.into(),
            opponent: opponent.into(),
            rounds_completed,
            round_count,
            overall: metrics.overall(),
            categories,
            feedback,
        }
    }

    pub fn strengths(&self) -> impl Iterator<Item = &FeedbackPoint> {
        self.feedback
            .iter()
            .filter(|p| p.kind == FeedbackKind::Strength)
    }

    pub fn weaknesses(&self) -> impl Iterator<Item = &FeedbackPoint> {
        self.feedback
            .iter()
            .filter(|p| p.kind == FeedbackKind::Weakness)
    }
}
