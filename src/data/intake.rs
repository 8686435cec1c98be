//! Record intake: contract validation before any engine sees the data.
//!
//! Invalid records are excluded and reported individually so that one bad
//! flow or snapshot never prevents evaluation of the rest of the batch.

use std::collections::HashSet;

use flowwatch_types::{Flow, MetricSnapshot, SnapshotKey, MAX_PRIORITY};
use tracing::warn;

use super::rates::divergent_rates;
use crate::error::Error;

/// Records that passed validation, and errors for those that did not.
#[derive(Debug)]
pub struct Intake<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Error>,
}

impl<T> Default for Intake<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Intake<T> {
    fn reject(&mut self, err: Error) {
        warn!("rejected record: {}", err);
        self.rejected.push(err);
    }
}

/// Treat whitespace-only descriptors as absent.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn validate_flow(flow: &Flow) -> Result<(), String> {
    if flow.id.trim().is_empty() {
        return Err("missing identifier".to_string());
    }
    if flow.channels.is_empty() {
        return Err("channel set is empty".to_string());
    }
    if let Some(priority) = flow.priority {
        if priority > MAX_PRIORITY {
            return Err(format!("priority {} is outside 0-{}", priority, MAX_PRIORITY));
        }
    }
    Ok(())
}

/// Validate and normalize flows.
///
/// Rejects flows with no identifier, an empty channel set, an out-of-range
/// priority, or an identifier already taken by an earlier flow.
pub fn intake_flows(records: impl IntoIterator<Item = Flow>) -> Intake<Flow> {
    let mut intake = Intake::default();
    let mut seen: HashSet<String> = HashSet::new();

    for mut flow in records {
        if let Err(reason) = validate_flow(&flow) {
            intake.reject(Error::invalid_flow(flow.id, reason));
            continue;
        }
        if !seen.insert(flow.id.clone()) {
            intake.reject(Error::invalid_flow(flow.id, "duplicate identifier"));
            continue;
        }

        flow.frequency = non_blank(flow.frequency);
        flow.suppression_rules = non_blank(flow.suppression_rules);
        intake.accepted.push(flow);
    }

    intake
}

fn describe_key(key: &SnapshotKey) -> String {
    format!(
        "{}/{}/{}/{}",
        key.workflow_id, key.period_start, key.period_type, key.channel
    )
}

/// Validate metric snapshots.
///
/// Rejects snapshots without a workflow identifier and any snapshot whose
/// natural key repeats an earlier one. Snapshots whose supplied rates
/// disagree with their counts are kept, with a warning.
pub fn intake_snapshots(records: impl IntoIterator<Item = MetricSnapshot>) -> Intake<MetricSnapshot> {
    let mut intake = Intake::default();
    let mut seen: HashSet<SnapshotKey> = HashSet::new();

    for snapshot in records {
        let key = snapshot.key();
        if snapshot.workflow_id.trim().is_empty() {
            intake.reject(Error::invalid_snapshot(
                describe_key(&key),
                "missing workflow identifier",
            ));
            continue;
        }
        if seen.contains(&key) {
            intake.reject(Error::invalid_snapshot(
                describe_key(&key),
                "duplicate natural key",
            ));
            continue;
        }

        for d in divergent_rates(&snapshot) {
            warn!(
                "snapshot {}: supplied {} {:.2} differs from derived {:.2}",
                describe_key(&key),
                d.metric,
                d.supplied,
                d.derived
            );
        }

        seen.insert(key);
        intake.accepted.push(snapshot);
    }

    intake
}
