//! Health of every metric series at its latest period.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use flowwatch_types::{HealthTarget, SeriesKey};
use serde::{Deserialize, Serialize};

use super::health::{HealthClassifier, RagResult, RagStatus};
use super::history::SnapshotHistory;
use super::rates::Trend;

/// Health targets: a default plus per-workflow overrides.
///
/// A workflow override only replaces the fields it sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targets {
    pub default: HealthTarget,
    pub workflows: BTreeMap<String, HealthTarget>,
}

impl Targets {
    pub fn for_workflow(&self, workflow_id: &str) -> HealthTarget {
        match self.workflows.get(workflow_id) {
            Some(specific) => specific.or(self.default),
            None => self.default,
        }
    }
}

/// Classification of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthEntry {
    pub series: SeriesKey,
    pub period_start: NaiveDate,
    pub trend: Trend,
    pub result: RagResult,
}

/// Latest-period health for every series, worst first.
#[derive(Debug, Clone, Default)]
pub struct HealthBoard {
    pub entries: Vec<HealthEntry>,
}

impl HealthBoard {
    pub fn build(
        history: &SnapshotHistory,
        targets: &Targets,
        classifier: &HealthClassifier,
    ) -> Self {
        let mut entries: Vec<HealthEntry> = history
            .latest()
            .map(|(current, previous)| {
                let target = targets.for_workflow(&current.workflow_id);
                HealthEntry {
                    series: current.series(),
                    period_start: current.period_start,
                    trend: Trend::between(current, previous),
                    result: classifier.classify(current, previous, &target),
                }
            })
            .collect();

        // Worst status first, then by series (workflow, period type, channel)
        entries.sort_by(|a, b| {
            b.result
                .status
                .cmp(&a.result.status)
                .then_with(|| a.series.cmp(&b.series))
        });

        Self { entries }
    }

    pub fn count(&self, status: RagStatus) -> usize {
        self.entries.iter().filter(|e| e.result.status == status).count()
    }

    /// Entries that are red or amber.
    pub fn attention(&self) -> impl Iterator<Item = &HealthEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.result.status, RagStatus::Red | RagStatus::Amber))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowwatch_types::{Channel, MetricSnapshot};

    fn snap(workflow: &str, day: u32, open_rate: f64) -> MetricSnapshot {
        MetricSnapshot::builder(
            workflow,
            NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            Channel::Email,
        )
        .open_rate(open_rate)
        .build()
    }

    #[test]
    fn test_workflow_target_overrides_default() {
        let targets = Targets {
            default: HealthTarget {
                open_rate: Some(20.0),
                bounce_rate: Some(2.0),
                ..HealthTarget::default()
            },
            workflows: BTreeMap::from([("vip".to_string(), HealthTarget::open_rate(40.0))]),
        };

        let vip = targets.for_workflow("vip");
        assert_eq!(vip.open_rate, Some(40.0));
        assert_eq!(vip.bounce_rate, Some(2.0));
        assert_eq!(targets.for_workflow("other").open_rate, Some(20.0));
    }

    #[test]
    fn test_board_sorts_worst_first() {
        let history = SnapshotHistory::new(vec![
            snap("green", 1, 35.0),
            snap("red", 1, 40.0),
            snap("red", 8, 20.0),
            snap("amber", 1, 25.0),
        ]);
        let targets = Targets {
            default: HealthTarget::open_rate(30.0),
            ..Targets::default()
        };

        let board = HealthBoard::build(&history, &targets, &HealthClassifier::default());
        let order: Vec<_> = board
            .entries
            .iter()
            .map(|e| (e.series.workflow_id.as_str(), e.result.status))
            .collect();

        assert_eq!(
            order,
            vec![
                ("red", RagStatus::Red),
                ("amber", RagStatus::Amber),
                ("green", RagStatus::Green),
            ]
        );
        assert_eq!(board.count(RagStatus::Red), 1);
        assert_eq!(board.attention().count(), 2);
    }

    #[test]
    fn test_board_uses_latest_period_and_trend() {
        let history = SnapshotHistory::new(vec![snap("wf", 1, 40.0), snap("wf", 8, 30.0)]);
        let board = HealthBoard::build(&history, &Targets::default(), &HealthClassifier::default());

        let entry = &board.entries[0];
        assert_eq!(entry.period_start, NaiveDate::from_ymd_opt(2024, 4, 8).unwrap());
        assert!((entry.trend.open_rate_change + 25.0).abs() < 1e-9);
        assert_eq!(entry.result.status, RagStatus::Red);
    }
}
