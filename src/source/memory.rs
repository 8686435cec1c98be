//! In-memory data source.
//!
//! Serves a dataset already held by the caller, e.g. one assembled by an
//! embedding application or a test.

use flowwatch_types::Dataset;

use super::{DataSource, Supply};
use crate::error::Error;

/// A data source over an in-memory [`Dataset`].
///
/// # Example
///
/// ```
/// use flowwatch::{DataSource, MemorySource};
/// use flowwatch_types::{Channel, Dataset, Flow};
///
/// let dataset = Dataset::builder()
///     .flow(Flow::builder("a", "A").channel(Channel::Push).build())
///     .build();
/// let mut source = MemorySource::new(dataset, "fixture");
///
/// assert_eq!(source.description(), "memory: fixture");
/// assert_eq!(source.fetch().unwrap().flows.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    dataset: Dataset,
    description: String,
}

impl MemorySource {
    pub fn new(dataset: Dataset, label: &str) -> Self {
        Self {
            dataset,
            description: format!("memory: {}", label),
        }
    }

    /// Replace the served dataset.
    pub fn replace(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }
}

impl DataSource for MemorySource {
    fn fetch(&mut self) -> Result<Supply, Error> {
        Ok(Supply {
            flows: self.dataset.flows.clone(),
            metrics: self.dataset.metrics.clone(),
            rejected: Vec::new(),
        })
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowwatch_types::{Channel, Flow};

    #[test]
    fn test_fetch_is_repeatable() {
        let dataset = Dataset::builder()
            .flow(Flow::builder("a", "A").channel(Channel::Email).build())
            .build();
        let mut source = MemorySource::new(dataset, "test");

        assert_eq!(source.fetch().unwrap().flows.len(), 1);
        assert_eq!(source.fetch().unwrap().flows.len(), 1);
    }

    #[test]
    fn test_replace() {
        let mut source = MemorySource::new(Dataset::default(), "test");
        assert!(source.fetch().unwrap().flows.is_empty());

        source.replace(
            Dataset::builder()
                .flow(Flow::builder("b", "B").channel(Channel::Sms).build())
                .build(),
        );
        assert_eq!(source.fetch().unwrap().flows[0].id, "b");
    }
}
