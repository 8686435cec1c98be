//! Delivery health classification.
//!
//! A snapshot's status comes from the first matching rule in [`RULES`]:
//! deliverability breaches first, then engagement collapse, then target
//! comparisons. Later rules are never consulted once one matches, so each
//! result carries the reason of exactly one rule.

use std::fmt;

use flowwatch_types::{HealthTarget, MetricSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::rates::{EffectiveRates, Trend};

/// Thresholds used by the health rules. Rates are percentages; changes are
/// week-over-week percentage changes.
///
/// The red deliverability thresholds are replaced per evaluation by the
/// matching [`HealthTarget`] field when one is set. The amber thresholds are
/// fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub complaint_red: f64,
    pub bounce_red: f64,
    pub unsubscribe_red: f64,
    pub complaint_amber: f64,
    pub bounce_amber: f64,
    pub unsubscribe_amber: f64,
    /// Open rate change at or below which the status is red.
    pub open_drop_red: f64,
    /// Open rate change at or below which the status is amber.
    pub open_drop_amber: f64,
    /// Sends change at or above which a volume spike is considered.
    pub volume_spike: f64,
    /// Open rate change below which a volume spike is red.
    pub spike_open_drop: f64,
    /// Fraction of the target open rate under which the status is red.
    pub target_floor: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            complaint_red: 0.05,
            bounce_red: 3.0,
            unsubscribe_red: 0.35,
            complaint_amber: 0.02,
            bounce_amber: 1.5,
            unsubscribe_amber: 0.20,
            open_drop_red: -25.0,
            open_drop_amber: -15.0,
            volume_spike: 60.0,
            spike_open_drop: -10.0,
            target_floor: 0.7,
        }
    }
}

/// Traffic-light health status.
///
/// Ordered by severity so the worst status sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStatus {
    Green,
    Unknown,
    Amber,
    Red,
}

impl RagStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RagStatus::Green => "GREEN",
            RagStatus::Unknown => "UNKNOWN",
            RagStatus::Amber => "AMBER",
            RagStatus::Red => "RED",
        }
    }
}

impl fmt::Display for RagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RagResult {
    pub status: RagStatus,
    pub reasons: Vec<String>,
    /// The rule that decided the status; `None` for the insufficient-data fallback.
    pub rule: Option<HealthRule>,
}

impl RagResult {
    fn unknown() -> Self {
        Self {
            status: RagStatus::Unknown,
            reasons: vec!["Insufficient data".to_string()],
            rule: None,
        }
    }
}

/// A row in the health decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthRule {
    ComplaintCritical,
    BounceCritical,
    UnsubscribeCritical,
    OpenRateCollapse,
    VolumeSpike,
    FarBelowTarget,
    ComplaintElevated,
    BounceElevated,
    UnsubscribeElevated,
    OpenRateDecline,
    BelowTarget,
    MeetingTarget,
}

/// The decision table, in evaluation order.
pub const RULES: [HealthRule; 12] = [
    HealthRule::ComplaintCritical,
    HealthRule::BounceCritical,
    HealthRule::UnsubscribeCritical,
    HealthRule::OpenRateCollapse,
    HealthRule::VolumeSpike,
    HealthRule::FarBelowTarget,
    HealthRule::ComplaintElevated,
    HealthRule::BounceElevated,
    HealthRule::UnsubscribeElevated,
    HealthRule::OpenRateDecline,
    HealthRule::BelowTarget,
    HealthRule::MeetingTarget,
];

/// Inputs every rule is checked against.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub rates: EffectiveRates,
    pub trend: Trend,
    pub target: &'a HealthTarget,
    pub thresholds: &'a HealthThresholds,
}

/// `Some(rate)` when the rate is present and strictly above `limit`.
fn above(rate: Option<f64>, limit: f64) -> Option<f64> {
    rate.filter(|r| *r > limit)
}

impl HealthRule {
    /// Status assigned when this rule matches.
    pub fn status(&self) -> RagStatus {
        match self {
            HealthRule::ComplaintCritical
            | HealthRule::BounceCritical
            | HealthRule::UnsubscribeCritical
            | HealthRule::OpenRateCollapse
            | HealthRule::VolumeSpike
            | HealthRule::FarBelowTarget => RagStatus::Red,
            HealthRule::ComplaintElevated
            | HealthRule::BounceElevated
            | HealthRule::UnsubscribeElevated
            | HealthRule::OpenRateDecline
            | HealthRule::BelowTarget => RagStatus::Amber,
            HealthRule::MeetingTarget => RagStatus::Green,
        }
    }

    /// Returns the reason text if this rule matches the evaluation.
    pub fn check(&self, e: &Evaluation<'_>) -> Option<String> {
        let t = e.thresholds;
        let open_change = e.trend.open_rate_change;

        match self {
            HealthRule::ComplaintCritical => {
                let limit = e.target.complaint_rate.unwrap_or(t.complaint_red);
                above(e.rates.complaint_rate, limit).map(|rate| {
                    format!("Complaint rate {:.2}% exceeds {:.2}% threshold", rate, limit)
                })
            }
            HealthRule::BounceCritical => {
                let limit = e.target.bounce_rate.unwrap_or(t.bounce_red);
                above(e.rates.bounce_rate, limit)
                    .map(|rate| format!("Bounce rate {:.1}% exceeds {:.1}% threshold", rate, limit))
            }
            HealthRule::UnsubscribeCritical => {
                let limit = e.target.unsubscribe_rate.unwrap_or(t.unsubscribe_red);
                above(e.rates.unsubscribe_rate, limit).map(|rate| {
                    format!("Unsubscribe rate {:.2}% exceeds {:.2}% threshold", rate, limit)
                })
            }
            HealthRule::OpenRateCollapse => (open_change <= t.open_drop_red)
                .then(|| format!("Open rate down {:.1}% week-over-week", open_change.abs())),
            HealthRule::VolumeSpike => {
                let sends_change = e.trend.sends_change;
                (sends_change >= t.volume_spike && open_change < t.spike_open_drop).then(|| {
                    format!(
                        "Volume spike with engagement drop: sends up {:.1}%, open rate down {:.1}%",
                        sends_change,
                        open_change.abs()
                    )
                })
            }
            HealthRule::FarBelowTarget => {
                let (open, target) = (e.rates.open_rate?, e.target.open_rate?);
                (open < target * t.target_floor).then(|| {
                    format!(
                        "Open rate {:.1}% is below {:.0}% of target {:.1}%",
                        open,
                        t.target_floor * 100.0,
                        target
                    )
                })
            }
            HealthRule::ComplaintElevated => above(e.rates.complaint_rate, t.complaint_amber)
                .map(|rate| {
                    format!(
                        "Complaint rate {:.2}% above {:.2}% warning level",
                        rate, t.complaint_amber
                    )
                }),
            HealthRule::BounceElevated => above(e.rates.bounce_rate, t.bounce_amber).map(|rate| {
                format!("Bounce rate {:.1}% above {:.1}% warning level", rate, t.bounce_amber)
            }),
            HealthRule::UnsubscribeElevated => above(e.rates.unsubscribe_rate, t.unsubscribe_amber)
                .map(|rate| {
                    format!(
                        "Unsubscribe rate {:.2}% above {:.2}% warning level",
                        rate, t.unsubscribe_amber
                    )
                }),
            HealthRule::OpenRateDecline => {
                (open_change <= t.open_drop_amber && open_change > t.open_drop_red)
                    .then(|| format!("Open rate down {:.1}% week-over-week", open_change.abs()))
            }
            HealthRule::BelowTarget => {
                let (open, target) = (e.rates.open_rate?, e.target.open_rate?);
                (open < target && open >= target * t.target_floor)
                    .then(|| format!("Open rate {:.1}% below target {:.1}%", open, target))
            }
            HealthRule::MeetingTarget => {
                let (open, target) = (e.rates.open_rate?, e.target.open_rate?);
                (open >= target).then(|| "Meeting targets".to_string())
            }
        }
    }
}

/// Classifies a snapshot against its predecessor and a target.
#[derive(Debug, Clone, Default)]
pub struct HealthClassifier {
    thresholds: HealthThresholds,
}

impl HealthClassifier {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Classify `current`.
    ///
    /// `previous` should be the immediately preceding period of the same
    /// series; a snapshot from another series is ignored (as if absent).
    pub fn classify(
        &self,
        current: &MetricSnapshot,
        previous: Option<&MetricSnapshot>,
        target: &HealthTarget,
    ) -> RagResult {
        let previous = previous.filter(|p| {
            let same_series = p.series() == current.series();
            if !same_series {
                warn!(
                    "ignoring previous snapshot of {} for {}: different series",
                    p.workflow_id, current.workflow_id
                );
            }
            same_series
        });

        let evaluation = Evaluation {
            rates: EffectiveRates::from_snapshot(current),
            trend: Trend::between(current, previous),
            target,
            thresholds: &self.thresholds,
        };

        for rule in RULES {
            if let Some(reason) = rule.check(&evaluation) {
                trace!("{}: {:?} matched", current.workflow_id, rule);
                return RagResult {
                    status: rule.status(),
                    reasons: vec![reason],
                    rule: Some(rule),
                };
            }
        }

        RagResult::unknown()
    }
}
