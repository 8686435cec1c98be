//! Read-only risk buckets over a detected conflict list.

use serde::{Deserialize, Serialize};

use super::conflict::FlowConflict;

/// Score cut-offs for the risk buckets and the length of the top list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Scores at or above this are high risk.
    pub high: f64,
    /// Scores at or above this (and below `high`) are medium risk.
    pub medium: f64,
    /// Number of conflicts in the top list.
    pub top: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            high: 5.0,
            medium: 3.0,
            top: 5,
        }
    }
}

/// Risk bucket for a conflict score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn for_score(score: f64, options: &SummaryOptions) -> Self {
        if score >= options.high {
            RiskLevel::High
        } else if score >= options.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MED",
            RiskLevel::Low => "LOW",
        }
    }
}

/// Conflicts partitioned by risk level, plus the highest scoring few.
///
/// Borrows the detector's sorted output; bucket order follows it.
#[derive(Debug, Clone)]
pub struct ConflictSummary<'c, 'a> {
    pub all: &'c [FlowConflict<'a>],
    pub high: Vec<&'c FlowConflict<'a>>,
    pub medium: Vec<&'c FlowConflict<'a>>,
    pub low: Vec<&'c FlowConflict<'a>>,
    pub top: Vec<&'c FlowConflict<'a>>,
}

impl<'c, 'a> ConflictSummary<'c, 'a> {
    /// Build a summary from conflicts already sorted by score, highest first.
    pub fn new(conflicts: &'c [FlowConflict<'a>], options: &SummaryOptions) -> Self {
        let mut high = Vec::new();
        let mut medium = Vec::new();
        let mut low = Vec::new();

        for conflict in conflicts {
            match RiskLevel::for_score(conflict.score, options) {
                RiskLevel::High => high.push(conflict),
                RiskLevel::Medium => medium.push(conflict),
                RiskLevel::Low => low.push(conflict),
            }
        }

        Self {
            all: conflicts,
            high,
            medium,
            low,
            top: conflicts.iter().take(options.top).collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    /// Conflicts involving a single flow, in score order.
    pub fn conflicts_for(&self, flow_id: &str) -> Vec<&'c FlowConflict<'a>> {
        self.all.iter().filter(|c| c.involves(flow_id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::conflict::detect_conflicts;
    use flowwatch_types::{Channel, Flow};

    /// Flows sharing email whose pairwise scores land in every bucket.
    fn flows() -> Vec<Flow> {
        let base = |id: &str| {
            Flow::builder(id, id)
                .product(id, id)
                .frequency("daily")
                .channel(Channel::Email)
                .suppression_rules("cap")
                .priority(50)
        };
        vec![
            // a-b: 2 + 1 channel + 1 similar = 4 (medium)
            base("a").build(),
            base("b").build(),
            // c with a or b: 2 + 1 + 1 missing suppression + 1 similar = 5 (high)
            Flow::builder("c", "c")
                .product("c", "c")
                .frequency("daily")
                .channel(Channel::Email)
                .priority(50)
                .build(),
        ]
    }

    #[test]
    fn test_buckets() {
        let flows = flows();
        let conflicts = detect_conflicts(&flows);
        let summary = ConflictSummary::new(&conflicts, &SummaryOptions::default());

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.high.len(), 2);
        assert_eq!(summary.medium.len(), 1);
        assert!(summary.low.is_empty());
        assert_eq!(summary.medium[0].score, 4.0);
    }

    #[test]
    fn test_top_is_capped() {
        let flows = flows();
        let conflicts = detect_conflicts(&flows);
        let options = SummaryOptions {
            top: 2,
            ..SummaryOptions::default()
        };
        let summary = ConflictSummary::new(&conflicts, &options);

        assert_eq!(summary.top.len(), 2);
        assert!(summary.top.iter().all(|c| c.score == 5.0));
    }

    #[test]
    fn test_conflicts_for_flow() {
        let flows = flows();
        let conflicts = detect_conflicts(&flows);
        let summary = ConflictSummary::new(&conflicts, &SummaryOptions::default());

        assert_eq!(summary.conflicts_for("c").len(), 2);
        assert_eq!(summary.conflicts_for("a").len(), 2);
        assert!(summary.conflicts_for("zzz").is_empty());
    }

    #[test]
    fn test_risk_level_boundaries() {
        let options = SummaryOptions::default();
        assert_eq!(RiskLevel::for_score(5.0, &options), RiskLevel::High);
        assert_eq!(RiskLevel::for_score(4.9, &options), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_score(3.0, &options), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_score(2.5, &options), RiskLevel::Low);
    }

    #[test]
    fn test_empty() {
        let summary = ConflictSummary::new(&[], &SummaryOptions::default());
        assert_eq!(summary.total(), 0);
        assert!(summary.top.is_empty());
    }
}
