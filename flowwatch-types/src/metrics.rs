//! Delivery metric snapshots.

use std::fmt;

use chrono::NaiveDate;

use crate::Channel;

/// Length of the period a snapshot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    /// Returns the lower-case label used in documents and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural key of a snapshot. Unique within a supplying store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    pub workflow_id: String,
    pub period_start: NaiveDate,
    pub period_type: PeriodType,
    pub channel: Channel,
}

/// A run of consecutive periods for one workflow on one channel.
///
/// Two snapshots in the same series differ only by period start.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub workflow_id: String,
    pub period_type: PeriodType,
    pub channel: Channel,
}

/// Delivery counts and rates for one workflow, channel and period.
///
/// Rates are percentages (`2.5` means 2.5%). A `None` rate means "not
/// supplied"; derived values are computed by the consumer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSnapshot {
    pub workflow_id: String,
    pub period_start: NaiveDate,
    pub period_type: PeriodType,
    pub channel: Channel,

    #[cfg_attr(feature = "serde", serde(default))]
    pub sends: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub opens: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clicks: u64,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unsubscribes: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bounces: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub complaints: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub delivered: Option<u64>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub open_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub click_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub click_to_open_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unsubscribe_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bounce_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub complaint_rate: Option<f64>,
}

impl MetricSnapshot {
    /// Create a builder for a snapshot.
    pub fn builder(
        workflow_id: impl Into<String>,
        period_start: NaiveDate,
        channel: Channel,
    ) -> MetricSnapshotBuilder {
        MetricSnapshotBuilder::new(workflow_id, period_start, channel)
    }

    /// The natural key of this snapshot.
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey {
            workflow_id: self.workflow_id.clone(),
            period_start: self.period_start,
            period_type: self.period_type,
            channel: self.channel,
        }
    }

    /// The series this snapshot belongs to.
    pub fn series(&self) -> SeriesKey {
        SeriesKey {
            workflow_id: self.workflow_id.clone(),
            period_type: self.period_type,
            channel: self.channel,
        }
    }
}

/// Builder for `MetricSnapshot`. Defaults to a weekly period with zero counts.
#[derive(Debug)]
pub struct MetricSnapshotBuilder {
    snapshot: MetricSnapshot,
}

impl MetricSnapshotBuilder {
    pub fn new(workflow_id: impl Into<String>, period_start: NaiveDate, channel: Channel) -> Self {
        Self {
            snapshot: MetricSnapshot {
                workflow_id: workflow_id.into(),
                period_start,
                period_type: PeriodType::Weekly,
                channel,
                sends: 0,
                opens: 0,
                clicks: 0,
                unsubscribes: None,
                bounces: None,
                complaints: None,
                delivered: None,
                open_rate: None,
                click_rate: None,
                click_to_open_rate: None,
                unsubscribe_rate: None,
                bounce_rate: None,
                complaint_rate: None,
            },
        }
    }

    pub fn period_type(mut self, period_type: PeriodType) -> Self {
        self.snapshot.period_type = period_type;
        self
    }

    /// Set sends, opens and clicks.
    pub fn counts(mut self, sends: u64, opens: u64, clicks: u64) -> Self {
        self.snapshot.sends = sends;
        self.snapshot.opens = opens;
        self.snapshot.clicks = clicks;
        self
    }

    pub fn unsubscribes(mut self, count: u64) -> Self {
        self.snapshot.unsubscribes = Some(count);
        self
    }

    pub fn bounces(mut self, count: u64) -> Self {
        self.snapshot.bounces = Some(count);
        self
    }

    pub fn complaints(mut self, count: u64) -> Self {
        self.snapshot.complaints = Some(count);
        self
    }

    pub fn delivered(mut self, count: u64) -> Self {
        self.snapshot.delivered = Some(count);
        self
    }

    pub fn open_rate(mut self, rate: f64) -> Self {
        self.snapshot.open_rate = Some(rate);
        self
    }

    pub fn click_rate(mut self, rate: f64) -> Self {
        self.snapshot.click_rate = Some(rate);
        self
    }

    pub fn click_to_open_rate(mut self, rate: f64) -> Self {
        self.snapshot.click_to_open_rate = Some(rate);
        self
    }

    pub fn unsubscribe_rate(mut self, rate: f64) -> Self {
        self.snapshot.unsubscribe_rate = Some(rate);
        self
    }

    pub fn bounce_rate(mut self, rate: f64) -> Self {
        self.snapshot.bounce_rate = Some(rate);
        self
    }

    pub fn complaint_rate(mut self, rate: f64) -> Self {
        self.snapshot.complaint_rate = Some(rate);
        self
    }

    pub fn build(self) -> MetricSnapshot {
        self.snapshot
    }
}
