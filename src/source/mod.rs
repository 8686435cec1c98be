//! Data source abstraction for fetching flows and metric snapshots.
//!
//! The engines never query storage themselves: a source fetches everything
//! once, up front, and hands over a [`Supply`].

mod file;
mod memory;

pub use file::FileSource;
pub use memory::MemorySource;

use std::fmt::Debug;

use flowwatch_types::{Flow, MetricSnapshot};

use crate::data::{intake_flows, intake_snapshots, Intake};
use crate::error::Error;

/// Records fetched from a source.
///
/// `rejected` holds records the source could not decode; the decoded ones
/// still need [`Supply::validate`] before analysis.
#[derive(Debug, Default)]
pub struct Supply {
    pub flows: Vec<Flow>,
    pub metrics: Vec<MetricSnapshot>,
    pub rejected: Vec<Error>,
}

/// Supply that passed intake, with every rejected record collected.
#[derive(Debug, Default)]
pub struct ValidatedSupply {
    pub flows: Vec<Flow>,
    pub metrics: Vec<MetricSnapshot>,
    pub rejected: Vec<Error>,
}

impl Supply {
    /// Run intake on the fetched records.
    pub fn validate(self) -> ValidatedSupply {
        let Intake {
            accepted: flows,
            rejected: bad_flows,
        } = intake_flows(self.flows);
        let Intake {
            accepted: metrics,
            rejected: bad_metrics,
        } = intake_snapshots(self.metrics);

        let mut rejected = self.rejected;
        rejected.extend(bad_flows);
        rejected.extend(bad_metrics);

        ValidatedSupply {
            flows,
            metrics,
            rejected,
        }
    }
}

/// Trait for fetching records from a storage collaborator.
///
/// # Example
///
/// ```
/// use flowwatch::{DataSource, MemorySource};
/// use flowwatch_types::Dataset;
///
/// let mut source = MemorySource::new(Dataset::default(), "empty");
/// let supply = source.fetch().unwrap();
/// assert!(supply.flows.is_empty());
/// ```
pub trait DataSource: Send + Debug {
    /// Fetch all flows and snapshots.
    ///
    /// Returns `Err` only when the source as a whole cannot be read.
    /// Individual undecodable records are reported in [`Supply::rejected`].
    fn fetch(&mut self) -> Result<Supply, Error>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
