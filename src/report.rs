//! Report assembly for the command line and JSON export.
//!
//! The report owns plain, serializable rows so it can outlive the records
//! the engines borrowed.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::Settings;
use crate::data::{
    detect_conflicts, ConflictSummary, FlowConflict, HealthBoard, HealthClassifier, HealthEntry,
    RagStatus, RiskLevel, SnapshotHistory,
};
use crate::source::ValidatedSupply;

#[derive(Debug, Clone, Serialize)]
pub struct ConflictRow {
    pub first_id: String,
    pub first_name: String,
    pub second_id: String,
    pub second_name: String,
    pub channels: Vec<String>,
    pub score: f64,
    pub level: &'static str,
    pub reasons: Vec<String>,
}

impl ConflictRow {
    fn new(conflict: &FlowConflict<'_>, settings: &Settings) -> Self {
        Self {
            first_id: conflict.first.id.clone(),
            first_name: conflict.first.name.clone(),
            second_id: conflict.second.id.clone(),
            second_name: conflict.second.name.clone(),
            channels: conflict.shared_channels.iter().map(ToString::to_string).collect(),
            score: conflict.score,
            level: RiskLevel::for_score(conflict.score, &settings.summary).label(),
            reasons: conflict.reasons(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictSection {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub top: Vec<ConflictRow>,
    pub all: Vec<ConflictRow>,
}

impl ConflictSection {
    /// Counts and rows for a conflict list already sorted by score.
    fn new(conflicts: &[FlowConflict<'_>], settings: &Settings) -> Self {
        let summary = ConflictSummary::new(conflicts, &settings.summary);
        Self {
            total: summary.total(),
            high: summary.high.len(),
            medium: summary.medium.len(),
            low: summary.low.len(),
            top: summary.top.iter().map(|c| ConflictRow::new(c, settings)).collect(),
            all: conflicts.iter().map(|c| ConflictRow::new(c, settings)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthRow {
    pub workflow_id: String,
    pub channel: String,
    pub period_type: String,
    pub period_start: String,
    pub status: RagStatus,
    pub reasons: Vec<String>,
    pub open_rate_change: f64,
    pub sends_change: f64,
}

impl From<&HealthEntry> for HealthRow {
    fn from(entry: &HealthEntry) -> Self {
        Self {
            workflow_id: entry.series.workflow_id.clone(),
            channel: entry.series.channel.to_string(),
            period_type: entry.series.period_type.to_string(),
            period_start: entry.period_start.to_string(),
            status: entry.result.status,
            reasons: entry.result.reasons.clone(),
            open_rate_change: entry.trend.open_rate_change,
            sends_change: entry.trend.sends_change,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthSection {
    pub red: usize,
    pub amber: usize,
    pub green: usize,
    pub unknown: usize,
    pub entries: Vec<HealthRow>,
}

/// Full evaluation output for one supply.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: String,
    /// Set when the conflict section is limited to one flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub flows: usize,
    pub snapshots: usize,
    pub rejected: Vec<String>,
    pub conflicts: ConflictSection,
    pub health: HealthSection,
}

impl Report {
    /// Run both engines over a validated supply.
    pub fn build(source: &str, supply: &ValidatedSupply, settings: &Settings) -> Self {
        Self::assemble(source, supply, settings, None)
    }

    /// Like [`Report::build`], but the conflict section only covers
    /// collisions involving `flow_id`. Counts and the top list are taken
    /// from that flow's conflicts alone.
    pub fn for_flow(
        source: &str,
        supply: &ValidatedSupply,
        settings: &Settings,
        flow_id: &str,
    ) -> Self {
        Self::assemble(source, supply, settings, Some(flow_id))
    }

    fn assemble(
        source: &str,
        supply: &ValidatedSupply,
        settings: &Settings,
        flow_id: Option<&str>,
    ) -> Self {
        let mut conflicts = detect_conflicts(&supply.flows);
        if let Some(flow_id) = flow_id {
            let involved: Vec<FlowConflict<'_>> =
                ConflictSummary::new(&conflicts, &settings.summary)
                    .conflicts_for(flow_id)
                    .into_iter()
                    .cloned()
                    .collect();
            conflicts = involved;
        }

        let history = SnapshotHistory::new(supply.metrics.iter().cloned());
        let classifier = HealthClassifier::new(settings.thresholds);
        let board = HealthBoard::build(&history, &settings.targets, &classifier);

        Self {
            source: source.to_string(),
            flow: flow_id.map(str::to_string),
            flows: supply.flows.len(),
            snapshots: supply.metrics.len(),
            rejected: supply.rejected.iter().map(ToString::to_string).collect(),
            conflicts: ConflictSection::new(&conflicts, settings),
            health: HealthSection {
                red: board.count(RagStatus::Red),
                amber: board.count(RagStatus::Amber),
                green: board.count(RagStatus::Green),
                unknown: board.count(RagStatus::Unknown),
                entries: board.entries.iter().map(HealthRow::from).collect(),
            },
        }
    }

    /// Plain-text rendering for a terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let c = &self.conflicts;
        let h = &self.health;

        let _ = writeln!(
            out,
            "{} - {} flows, {} snapshots",
            self.source, self.flows, self.snapshots
        );
        if !self.rejected.is_empty() {
            let _ = writeln!(out, "\nRejected records ({}):", self.rejected.len());
            for reason in &self.rejected {
                let _ = writeln!(out, "  ! {}", reason);
            }
        }

        let scope = match &self.flow {
            Some(flow_id) => format!("Conflicts involving {}", flow_id),
            None => "Conflicts".to_string(),
        };
        let _ = writeln!(
            out,
            "\n{}: {} total ({} high, {} medium, {} low)",
            scope, c.total, c.high, c.medium, c.low
        );
        for row in &c.top {
            let _ = writeln!(
                out,
                "  [{:<4}] {:>4.1}  {} <-> {}  ({})",
                row.level,
                row.score,
                row.first_name,
                row.second_name,
                row.channels.join(", ")
            );
            for reason in &row.reasons {
                let _ = writeln!(out, "           - {}", reason);
            }
        }

        let _ = writeln!(
            out,
            "\nHealth: {} red, {} amber, {} green, {} unknown",
            h.red, h.amber, h.green, h.unknown
        );
        for row in &h.entries {
            let _ = writeln!(
                out,
                "  [{:<7}] {} {} {} ({}): {}",
                row.status.label(),
                row.workflow_id,
                row.channel,
                row.period_type,
                row.period_start,
                row.reasons.join("; ")
            );
        }

        out
    }

    /// Write the report as pretty JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
