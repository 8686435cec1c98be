//! Analysis of flows and metric snapshots.
//!
//! This module holds the two engines and the helpers they share. Everything
//! here is a pure function of its inputs: no I/O, no clocks, no shared state.
//!
//! ## Submodules
//!
//! - [`intake`]: Contract validation; invalid records are excluded and reported
//! - [`conflict`]: Pairwise flow collision scoring ([`detect_conflicts`])
//! - [`summary`]: Risk buckets and top list over detected conflicts
//! - [`rates`]: Derived rates and week-over-week changes
//! - [`health`]: The health decision table ([`HealthClassifier`])
//! - [`history`]: Per-series ordering for previous-period lookups
//! - [`board`]: Latest health of every series
//!
//! ## Data Flow
//!
//! ```text
//! Flow records ──▶ intake_flows() ──▶ detect_conflicts() ──▶ ConflictSummary
//!
//! MetricSnapshot records
//!        │
//!        ▼
//! intake_snapshots() ──▶ SnapshotHistory ──▶ HealthBoard
//!                                               │
//!                                               └──▶ HealthClassifier::classify()
//! ```

pub mod board;
pub mod conflict;
pub mod health;
pub mod history;
pub mod intake;
pub mod rates;
pub mod summary;

pub use board::{HealthBoard, HealthEntry, Targets};
pub use conflict::{detect_conflicts, evaluate_pair, FlowConflict, Gate, RiskFactor};
pub use health::{HealthClassifier, HealthRule, HealthThresholds, RagResult, RagStatus, RULES};
pub use history::SnapshotHistory;
pub use intake::{intake_flows, intake_snapshots, Intake};
pub use rates::{wow_change, DerivedRates, EffectiveRates, Trend};
pub use summary::{ConflictSummary, RiskLevel, SummaryOptions};
