//! Per-series snapshot history for previous-period lookups.

use std::collections::BTreeMap;

use flowwatch_types::{MetricSnapshot, SeriesKey};

/// Snapshots grouped by series and ordered by period start.
///
/// Built from snapshots that already passed intake, so each period appears
/// at most once per series.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    series: BTreeMap<SeriesKey, Vec<MetricSnapshot>>,
}

impl SnapshotHistory {
    pub fn new(snapshots: impl IntoIterator<Item = MetricSnapshot>) -> Self {
        let mut series: BTreeMap<SeriesKey, Vec<MetricSnapshot>> = BTreeMap::new();
        for snapshot in snapshots {
            series.entry(snapshot.series()).or_default().push(snapshot);
        }
        for periods in series.values_mut() {
            periods.sort_by_key(|s| s.period_start);
        }
        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// All periods of one series, oldest first.
    pub fn periods(&self, key: &SeriesKey) -> &[MetricSnapshot] {
        self.series.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The snapshot of the period immediately before `snapshot` in its series.
    pub fn previous(&self, snapshot: &MetricSnapshot) -> Option<&MetricSnapshot> {
        self.periods(&snapshot.series())
            .iter()
            .take_while(|s| s.period_start < snapshot.period_start)
            .last()
    }

    /// The latest snapshot of every series with its predecessor, in series order.
    pub fn latest(&self) -> impl Iterator<Item = (&MetricSnapshot, Option<&MetricSnapshot>)> {
        self.series.values().filter_map(|periods| match periods.as_slice() {
            [] => None,
            [only] => Some((only, None)),
            [.., previous, latest] => Some((latest, Some(previous))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flowwatch_types::{Channel, PeriodType};

    fn snap(workflow: &str, day: u32, channel: Channel) -> MetricSnapshot {
        MetricSnapshot::builder(
            workflow,
            NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            channel,
        )
        .build()
    }

    #[test]
    fn test_groups_and_orders_periods() {
        let history = SnapshotHistory::new(vec![
            snap("wf", 19, Channel::Email),
            snap("wf", 5, Channel::Email),
            snap("wf", 12, Channel::Email),
            snap("wf", 12, Channel::Push),
        ]);

        assert_eq!(history.len(), 2);
        let email = snap("wf", 1, Channel::Email).series();
        let days: Vec<_> = history.periods(&email).iter().map(|s| s.period_start).collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_previous_is_immediately_preceding() {
        let history = SnapshotHistory::new(vec![
            snap("wf", 5, Channel::Email),
            snap("wf", 12, Channel::Email),
            snap("wf", 19, Channel::Email),
        ]);

        let previous = history.previous(&snap("wf", 19, Channel::Email)).unwrap();
        assert_eq!(previous.period_start, NaiveDate::from_ymd_opt(2024, 2, 12).unwrap());
        assert!(history.previous(&snap("wf", 5, Channel::Email)).is_none());
    }

    #[test]
    fn test_previous_never_crosses_series() {
        let monthly = MetricSnapshot::builder(
            "wf",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            Channel::Email,
        )
        .period_type(PeriodType::Monthly)
        .build();
        let history = SnapshotHistory::new(vec![monthly, snap("other", 5, Channel::Email)]);

        assert!(history.previous(&snap("wf", 12, Channel::Email)).is_none());
    }

    #[test]
    fn test_latest_pairs() {
        let history = SnapshotHistory::new(vec![
            snap("a", 5, Channel::Email),
            snap("a", 12, Channel::Email),
            snap("b", 5, Channel::Sms),
        ]);

        let latest: Vec<_> = history
            .latest()
            .map(|(current, previous)| (current.workflow_id.as_str(), previous.is_some()))
            .collect();
        assert_eq!(latest, vec![("a", true), ("b", false)]);
    }

    #[test]
    fn test_empty() {
        let history = SnapshotHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.latest().count(), 0);
    }
}
