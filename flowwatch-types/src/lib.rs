//! # flowwatch-types
//!
//! Core record types for messaging flow diagnostics. This crate defines the
//! schema a storage collaborator uses to hand flows and delivery metrics to
//! the flowwatch engines.
//!
//! ## Design Goals
//!
//! - **Explicit absence**: optional fields are `Option`, never sentinel values
//!   (a priority of `0` is real data, distinct from "no priority")
//! - **Closed vocabularies**: channels, trigger kinds and period types are enums
//! - **Optional serialization**: enable the `serde` feature as needed
//! - **Versioned documents**: datasets carry a schema version
//! - **Ergonomic builders**: fluent API for constructing records
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use flowwatch_types::{Cadence, Channel, Flow, TriggerKind};
//!
//! let flow = Flow::builder("welcome", "Welcome series")
//!     .product("onboarding", "Onboarding")
//!     .trigger(TriggerKind::Event)
//!     .frequency("Daily at 9am")
//!     .channel(Channel::Email)
//!     .channel(Channel::Push)
//!     .priority(60)
//!     .build();
//!
//! assert_eq!(flow.cadence(), Cadence::Daily);
//! assert_eq!(flow.effective_priority(), 60);
//! ```

mod dataset;
mod flow;
mod metrics;
mod target;

pub use dataset::*;
pub use flow::*;
pub use metrics::*;
pub use target::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the dataset format.
pub const SCHEMA_VERSION: u32 = 1;
