//! # flowwatch
//!
//! Collision risk and delivery health diagnostics for scheduled messaging
//! flows.
//!
//! An organization running several automated messaging programs at once
//! needs to know two things: which flows are likely to hit the same people on
//! the same channel at incompatible cadences, and which flows' delivery
//! performance is degrading. flowwatch answers both from data fetched once
//! from a storage collaborator.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌──────────┐    ┌──────────────────────────┐  │
//! │  │ source  │───▶│  intake  │───▶│ conflict ──▶ summary     │  │
//! │  │ (fetch) │    │(validate)│    │ history  ──▶ health board│  │
//! │  └─────────┘    └──────────┘    └────────────┬─────────────┘  │
//! │       ▲                                      ▼                │
//! │  FileSource | MemorySource              report (text/JSON)    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`DataSource`] trait with file and in-memory implementations
//! - **[`data`]**: intake validation, the conflict detector, the health
//!   classifier and their helpers
//! - **[`config`]**: [`Settings`] from a TOML file and `FLOWWATCH_*` variables
//! - **[`report`]**: plain rows for printing or exporting
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! flowwatch --file dataset.json --config flowwatch.toml
//! flowwatch --file dataset.json --export report.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use flowwatch::data::{detect_conflicts, ConflictSummary, SummaryOptions};
//! use flowwatch_types::{Channel, Flow, TriggerKind};
//!
//! let flows = vec![
//!     Flow::builder("cart", "Cart reminder")
//!         .trigger(TriggerKind::Event)
//!         .channel(Channel::Email)
//!         .build(),
//!     Flow::builder("digest", "Daily digest")
//!         .frequency("Daily")
//!         .channel(Channel::Email)
//!         .build(),
//! ];
//!
//! let conflicts = detect_conflicts(&flows);
//! let summary = ConflictSummary::new(&conflicts, &SummaryOptions::default());
//! assert_eq!(summary.total(), 1);
//! ```
//!
//! ### Classifying one snapshot
//!
//! ```
//! use chrono::NaiveDate;
//! use flowwatch::data::{HealthClassifier, RagStatus};
//! use flowwatch_types::{Channel, HealthTarget, MetricSnapshot};
//!
//! let week = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
//! let snapshot = MetricSnapshot::builder("digest", week, Channel::Email)
//!     .counts(1000, 320, 41)
//!     .build();
//!
//! let result = HealthClassifier::default().classify(
//!     &snapshot,
//!     None,
//!     &HealthTarget::open_rate(30.0),
//! );
//! assert_eq!(result.status, RagStatus::Green);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod source;

pub use config::Settings;
pub use data::{
    detect_conflicts, ConflictSummary, FlowConflict, HealthBoard, HealthClassifier,
    HealthThresholds, RagResult, RagStatus,
};
pub use error::{Error, ErrorKind};
pub use report::Report;
pub use source::{DataSource, FileSource, MemorySource, Supply, ValidatedSupply};
