//! File-based data source.
//!
//! Reads a JSON [`Dataset`](flowwatch_types::Dataset) document.

use std::fs;
use std::path::{Path, PathBuf};

use flowwatch_types::{Flow, MetricSnapshot, SchemaVersion};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{DataSource, Supply};
use crate::error::Error;

/// Document shape with records left undecoded, so each one can fail alone.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    version: SchemaVersion,
    #[serde(default)]
    flows: Vec<Value>,
    #[serde(default)]
    metrics: Vec<Value>,
}

/// A data source that reads a dataset from a JSON file.
///
/// Records are decoded one at a time: a flow with an unknown channel or a
/// snapshot missing its period start is reported and skipped while the rest
/// of the file is still used.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decode each record, collecting failures instead of stopping.
fn decode_records<T: DeserializeOwned>(
    kind: &str,
    records: Vec<Value>,
    rejected: &mut Vec<Error>,
) -> Vec<T> {
    let mut decoded = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let label = match record.get("id").or_else(|| record.get("workflow_id")) {
            Some(Value::String(id)) => format!("{} #{} ({})", kind, index, id),
            _ => format!("{} #{}", kind, index),
        };
        match serde_json::from_value::<T>(record) {
            Ok(value) => decoded.push(value),
            Err(e) => {
                warn!("skipping {}: {}", label, e);
                rejected.push(Error::Parse {
                    what: label,
                    message: e.to_string(),
                });
            }
        }
    }
    decoded
}

impl DataSource for FileSource {
    fn fetch(&mut self) -> Result<Supply, Error> {
        let content = fs::read_to_string(&self.path)?;
        let raw: RawDataset = serde_json::from_str(&content)?;

        if !raw.version.is_compatible() {
            warn!(
                "{}: schema version {}.{} may not be compatible",
                self.description, raw.version.major, raw.version.minor
            );
        }

        let mut rejected = Vec::new();
        let flows: Vec<Flow> = decode_records("flow", raw.flows, &mut rejected);
        let metrics: Vec<MetricSnapshot> = decode_records("snapshot", raw.metrics, &mut rejected);

        debug!(
            "{}: {} flows, {} snapshots, {} undecodable",
            self.description,
            flows.len(),
            metrics.len(),
            rejected.len()
        );

        Ok(Supply {
            flows,
            metrics,
            rejected,
        })
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "version": { "major": 1, "minor": 0 },
            "flows": [
                {
                    "id": "welcome",
                    "name": "Welcome",
                    "product_id": "app",
                    "trigger": "event",
                    "frequency": "Daily",
                    "channels": ["email", "push"]
                },
                {
                    "id": "fax-blast",
                    "name": "Fax blast",
                    "product_id": "app",
                    "trigger": "scheduled",
                    "channels": ["fax"]
                }
            ],
            "metrics": [
                {
                    "workflow_id": "welcome",
                    "period_start": "2024-03-04",
                    "period_type": "weekly",
                    "channel": "email",
                    "sends": 1000,
                    "opens": 300
                },
                {
                    "workflow_id": "welcome",
                    "period_type": "weekly",
                    "channel": "email"
                }
            ]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/dataset.json");
        assert_eq!(source.path(), Path::new("/tmp/dataset.json"));
        assert_eq!(source.description(), "file: /tmp/dataset.json");
    }

    #[test]
    fn test_file_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let supply = source.fetch().unwrap();

        assert_eq!(supply.flows.len(), 1);
        assert_eq!(supply.flows[0].id, "welcome");
        assert_eq!(supply.metrics.len(), 1);
        assert_eq!(supply.metrics[0].sends, 1000);
    }

    #[test]
    fn test_file_source_skips_undecodable_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let supply = FileSource::new(file.path()).fetch().unwrap();

        assert_eq!(supply.rejected.len(), 2);
        assert!(supply.rejected.iter().all(|e| e.kind() == ErrorKind::Parse));
        assert!(supply.rejected[0].to_string().contains("flow #1 (fax-blast)"));
        assert!(supply.rejected[1].to_string().contains("snapshot #1 (welcome)"));
    }

    #[test]
    fn test_file_source_missing_sections_are_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();

        let supply = FileSource::new(file.path()).fetch().unwrap();
        assert!(supply.flows.is_empty());
        assert!(supply.metrics.is_empty());
        assert!(supply.rejected.is_empty());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/dataset.json");

        let err = source.fetch().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let err = FileSource::new(file.path()).fetch().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
