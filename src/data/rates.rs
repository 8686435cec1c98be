//! Rate derivation and week-over-week change helpers.

use flowwatch_types::MetricSnapshot;

/// Maximum gap, in percentage points, tolerated between a supplied rate and
/// the rate derived from the snapshot's own counts.
pub const RATE_TOLERANCE: f64 = 0.1;

/// `numerator / denominator` as a percentage, or `None` for a zero denominator.
fn percent(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64 * 100.0)
}

/// Rates computed purely from a snapshot's counts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedRates {
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub click_to_open_rate: Option<f64>,
    /// `sends - bounces` when bounces are known.
    pub delivered: Option<u64>,
    pub unsubscribe_rate: Option<f64>,
    pub bounce_rate: Option<f64>,
    pub complaint_rate: Option<f64>,
}

impl DerivedRates {
    pub fn from_snapshot(s: &MetricSnapshot) -> Self {
        let delivered = s.bounces.map(|b| s.sends.saturating_sub(b));

        // Deliverability rates are per delivered message when that is known.
        let denominator = s.delivered.or(delivered).unwrap_or(s.sends);
        let per_delivered = |count: Option<u64>| count.and_then(|c| percent(c, denominator));

        Self {
            open_rate: percent(s.opens, s.sends),
            click_rate: percent(s.clicks, s.sends),
            click_to_open_rate: percent(s.clicks, s.opens),
            delivered,
            unsubscribe_rate: per_delivered(s.unsubscribes),
            bounce_rate: per_delivered(s.bounces),
            complaint_rate: per_delivered(s.complaints),
        }
    }
}

/// The rates the classifier works with: supplied where present, derived
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveRates {
    pub open_rate: Option<f64>,
    pub click_rate: Option<f64>,
    pub click_to_open_rate: Option<f64>,
    pub unsubscribe_rate: Option<f64>,
    pub bounce_rate: Option<f64>,
    pub complaint_rate: Option<f64>,
}

impl EffectiveRates {
    pub fn from_snapshot(s: &MetricSnapshot) -> Self {
        let derived = DerivedRates::from_snapshot(s);
        Self {
            open_rate: s.open_rate.or(derived.open_rate),
            click_rate: s.click_rate.or(derived.click_rate),
            click_to_open_rate: s.click_to_open_rate.or(derived.click_to_open_rate),
            unsubscribe_rate: s.unsubscribe_rate.or(derived.unsubscribe_rate),
            bounce_rate: s.bounce_rate.or(derived.bounce_rate),
            complaint_rate: s.complaint_rate.or(derived.complaint_rate),
        }
    }
}

/// A supplied rate that disagrees with the counts it should come from.
#[derive(Debug, Clone, PartialEq)]
pub struct RateDivergence {
    pub metric: &'static str,
    pub supplied: f64,
    pub derived: f64,
}

/// List supplied rates further than [`RATE_TOLERANCE`] from their derived value.
///
/// Rates that cannot be derived (missing counts) are not compared.
pub fn divergent_rates(s: &MetricSnapshot) -> Vec<RateDivergence> {
    let derived = DerivedRates::from_snapshot(s);
    let pairs = [
        ("open_rate", s.open_rate, derived.open_rate),
        ("click_rate", s.click_rate, derived.click_rate),
        ("click_to_open_rate", s.click_to_open_rate, derived.click_to_open_rate),
        ("unsubscribe_rate", s.unsubscribe_rate, derived.unsubscribe_rate),
        ("bounce_rate", s.bounce_rate, derived.bounce_rate),
        ("complaint_rate", s.complaint_rate, derived.complaint_rate),
    ];

    pairs
        .into_iter()
        .filter_map(|(metric, supplied, derived)| match (supplied, derived) {
            (Some(supplied), Some(derived)) if (supplied - derived).abs() > RATE_TOLERANCE => {
                Some(RateDivergence {
                    metric,
                    supplied,
                    derived,
                })
            }
            _ => None,
        })
        .collect()
}

/// Week-over-week percentage change from `previous` to `current`.
///
/// Returns 0 when either side is absent or the previous value is zero, so a
/// missing baseline never reads as a drop.
pub fn wow_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            (current - previous) / previous * 100.0
        }
        _ => 0.0,
    }
}

/// Week-over-week changes between a snapshot and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Trend {
    pub open_rate_change: f64,
    pub click_rate_change: f64,
    pub sends_change: f64,
}

impl Trend {
    pub fn between(current: &MetricSnapshot, previous: Option<&MetricSnapshot>) -> Self {
        let Some(previous) = previous else {
            return Self::default();
        };
        let now = EffectiveRates::from_snapshot(current);
        let before = EffectiveRates::from_snapshot(previous);

        Self {
            open_rate_change: wow_change(now.open_rate, before.open_rate),
            click_rate_change: wow_change(now.click_rate, before.click_rate),
            sends_change: wow_change(Some(current.sends as f64), Some(previous.sends as f64)),
        }
    }
}
