//! Settings loaded from an optional config file and the environment.
//!
//! ```toml
//! [thresholds]
//! bounce_red = 2.5
//!
//! [targets.default]
//! open_rate = 25.0
//!
//! [targets.workflows.welcome]
//! open_rate = 40.0
//!
//! [summary]
//! top = 10
//! ```
//!
//! Any value can be overridden with `FLOWWATCH_<SECTION>__<KEY>`, e.g.
//! `FLOWWATCH_THRESHOLDS__BOUNCE_RED=2.0`.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::{HealthThresholds, SummaryOptions, Targets};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "FLOWWATCH";

/// Everything tunable about an evaluation. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: HealthThresholds,
    pub targets: Targets,
    pub summary: SummaryOptions,
}

impl Settings {
    /// Load settings from `path` (if given) layered under environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;
        Ok(settings)
    }
}
