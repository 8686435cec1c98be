//! Pairwise collision risk between flows.
//!
//! Two flows collide when they reach the same audience on the same channel at
//! cadences that can stack up. A pair is only scored once it clears three
//! gates (shared channel, compatible cadence, close priorities); the score is
//! then the sum of a fixed set of [`RiskFactor`] weights.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use flowwatch_types::{Cadence, Channel, Flow};
use tracing::{debug, trace};

/// Priority separation above which the messaging system is expected to
/// resolve ordering itself. A gap of exactly this value still gates through.
pub const PRIORITY_GATE: u8 = 10;

/// Priority separation at or below which priorities count as similar.
pub const SIMILAR_PRIORITY: u8 = 5;

/// One additive contribution to a pair's risk score.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskFactor {
    /// Both flows send daily.
    BothDaily,
    /// Both flows belong to the same product.
    SameProduct,
    /// Number of channels the flows share.
    SharedChannels(usize),
    /// The named flow has no suppression rules.
    MissingSuppression(String),
    /// The named flow has no declared priority.
    MissingPriority(String),
    /// Priorities are within [`SIMILAR_PRIORITY`] of each other.
    SimilarPriorities,
}

impl RiskFactor {
    /// Contribution of this factor to the risk score.
    pub fn weight(&self) -> f64 {
        match self {
            RiskFactor::BothDaily => 2.0,
            RiskFactor::SameProduct => 1.0,
            RiskFactor::SharedChannels(n) => *n as f64,
            RiskFactor::MissingSuppression(_) => 1.0,
            RiskFactor::MissingPriority(_) => 0.5,
            RiskFactor::SimilarPriorities => 1.0,
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::BothDaily => write!(f, "Both Daily frequency"),
            RiskFactor::SameProduct => write!(f, "Same product"),
            RiskFactor::SharedChannels(n) => write!(f, "{} shared channel(s)", n),
            RiskFactor::MissingSuppression(name) => write!(f, "{} missing suppression rules", name),
            RiskFactor::MissingPriority(name) => write!(f, "{} missing priority", name),
            RiskFactor::SimilarPriorities => write!(f, "Similar priorities"),
        }
    }
}

/// Why a pair was not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    NoSharedChannel,
    CadenceMismatch,
    PriorityGap,
}

/// A pair of flows likely to collide, with the factors behind its score.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConflict<'a> {
    pub first: &'a Flow,
    pub second: &'a Flow,
    pub shared_channels: Vec<Channel>,
    pub factors: Vec<RiskFactor>,
    /// Sum of factor weights, rounded to one decimal place.
    pub score: f64,
}

impl FlowConflict<'_> {
    /// Human-readable justification, one entry per factor.
    pub fn reasons(&self) -> Vec<String> {
        self.factors.iter().map(ToString::to_string).collect()
    }

    /// Returns true if the flow with this id is one side of the pair.
    pub fn involves(&self, flow_id: &str) -> bool {
        self.first.id == flow_id || self.second.id == flow_id
    }
}

/// Round half-up to one decimal place. Scores are never negative.
fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

fn cadence_compatible(a: &Flow, b: &Flow) -> bool {
    let (cadence_a, cadence_b) = (a.cadence(), b.cadence());

    // A daily flow stacks with event-driven or profile-driven sends.
    let daily_against = |daily: Cadence, other: &Flow, other_cadence: Cadence| {
        daily.is_daily() && (other.trigger.is_event() || other_cadence == Cadence::ProfileBased)
    };

    (cadence_a.is_daily() && cadence_b.is_daily())
        || daily_against(cadence_a, b, cadence_b)
        || daily_against(cadence_b, a, cadence_a)
        || (a.trigger.is_event() && b.trigger.is_event())
}

/// Check the gates for a pair and score it if they all pass.
pub fn evaluate_pair<'a>(a: &'a Flow, b: &'a Flow) -> Result<FlowConflict<'a>, Gate> {
    let shared_channels = a.shared_channels(b);
    if shared_channels.is_empty() {
        return Err(Gate::NoSharedChannel);
    }
    if !cadence_compatible(a, b) {
        return Err(Gate::CadenceMismatch);
    }
    let priority_gap = a.effective_priority().abs_diff(b.effective_priority());
    if priority_gap > PRIORITY_GATE {
        return Err(Gate::PriorityGap);
    }

    let mut factors = Vec::new();
    if a.cadence().is_daily() && b.cadence().is_daily() {
        factors.push(RiskFactor::BothDaily);
    }
    if a.product_id == b.product_id {
        factors.push(RiskFactor::SameProduct);
    }
    factors.push(RiskFactor::SharedChannels(shared_channels.len()));
    for flow in [a, b] {
        if flow.suppression_rules.is_none() {
            factors.push(RiskFactor::MissingSuppression(flow.name.clone()));
        }
    }
    for flow in [a, b] {
        if flow.priority.is_none() {
            factors.push(RiskFactor::MissingPriority(flow.name.clone()));
        }
    }
    if priority_gap <= SIMILAR_PRIORITY {
        factors.push(RiskFactor::SimilarPriorities);
    }

    let score = round_score(factors.iter().map(RiskFactor::weight).sum());
    Ok(FlowConflict {
        first: a,
        second: b,
        shared_channels,
        factors,
        score,
    })
}

/// Index pairs `(i, j)`, `i < j`, of flows sharing at least one channel,
/// in ascending index order.
fn candidate_pairs(flows: &[Flow]) -> BTreeSet<(usize, usize)> {
    let mut buckets: BTreeMap<Channel, Vec<usize>> = BTreeMap::new();
    for (index, flow) in flows.iter().enumerate() {
        for channel in &flow.channels {
            buckets.entry(*channel).or_default().push(index);
        }
    }

    let mut pairs = BTreeSet::new();
    for members in buckets.values() {
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                pairs.insert((i, j));
            }
        }
    }
    pairs
}

/// Find every pair of flows at risk of colliding.
///
/// Returns conflicts sorted by score, highest first. Ties keep discovery
/// order (pairs in ascending index order of the input).
pub fn detect_conflicts(flows: &[Flow]) -> Vec<FlowConflict<'_>> {
    let mut conflicts: Vec<FlowConflict<'_>> = candidate_pairs(flows)
        .into_iter()
        .filter_map(|(i, j)| match evaluate_pair(&flows[i], &flows[j]) {
            Ok(conflict) => Some(conflict),
            Err(gate) => {
                trace!("skipping {} / {}: {:?}", flows[i].id, flows[j].id, gate);
                None
            }
        })
        .collect();

    // Stable: equal scores stay in discovery order.
    conflicts.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!("found {} conflicts among {} flows", conflicts.len(), flows.len());
    conflicts
}
