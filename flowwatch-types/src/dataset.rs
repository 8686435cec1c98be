//! Dataset - the document a storage collaborator hands to flowwatch.

use crate::{Flow, MetricSnapshot, SCHEMA_VERSION};

/// Layout revision of a [`Dataset`] document.
///
/// Readers accept any document with the same `major`; a newer `minor` may
/// carry fields they ignore. Documents written without a version are read
/// as the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The layout this crate writes.
    pub const fn current() -> Self {
        Self::new(SCHEMA_VERSION, 0)
    }

    /// Whether this crate can read a document of this version.
    pub fn is_compatible(&self) -> bool {
        self.major == SCHEMA_VERSION
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

/// All flows and metric snapshots fetched for one evaluation.
///
/// # Example
///
/// ```rust
/// use flowwatch_types::{Channel, Dataset, Flow};
///
/// let dataset = Dataset::builder()
///     .flow(Flow::builder("a", "Welcome").channel(Channel::Email).build())
///     .build();
///
/// assert_eq!(dataset.flows.len(), 1);
/// assert!(dataset.metrics.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dataset {
    /// Schema version for forward compatibility.
    pub version: SchemaVersion,

    /// Active flows.
    pub flows: Vec<Flow>,

    /// Metric snapshots, in any order.
    pub metrics: Vec<MetricSnapshot>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty() && self.metrics.is_empty()
    }
}

/// Builder for `Dataset`.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    flows: Vec<Flow>,
    metrics: Vec<MetricSnapshot>,
}

impl DatasetBuilder {
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flows.push(flow);
        self
    }

    pub fn flows(mut self, flows: impl IntoIterator<Item = Flow>) -> Self {
        self.flows.extend(flows);
        self
    }

    pub fn metric(mut self, snapshot: MetricSnapshot) -> Self {
        self.metrics.push(snapshot);
        self
    }

    pub fn metrics(mut self, snapshots: impl IntoIterator<Item = MetricSnapshot>) -> Self {
        self.metrics.extend(snapshots);
        self
    }

    pub fn build(self) -> Dataset {
        Dataset {
            version: SchemaVersion::current(),
            flows: self.flows,
            metrics: self.metrics,
        }
    }
}
