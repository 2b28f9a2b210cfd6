//! Rebalancing configuration.
//!
//! Values come from code (`Default` + `with_*`) or from the environment:
//! - `SMARTSTOCK_THRESHOLD`: balanced band half-width (default 3)
//! - `SMARTSTOCK_UNMATCHED_POLICY`: `skip` (default) or `reject`
//! - `SMARTSTOCK_PERIOD`: integer period to rebalance (default: latest)
//! - `SMARTSTOCK_PERIOD_COLUMN`: period column of input tables (default `day`;
//!   `none` reads the table as a single period), see [`ColumnMapping::from_lookup`]
//!
//! [`ColumnMapping::from_lookup`]: crate::table::ColumnMapping::from_lookup

use serde::{Deserialize, Serialize};

use smartstock_inventory::{PeriodSelection, Threshold, UnmatchedPolicy};

use crate::error::EngineError;

pub const ENV_THRESHOLD: &str = "SMARTSTOCK_THRESHOLD";
pub const ENV_UNMATCHED_POLICY: &str = "SMARTSTOCK_UNMATCHED_POLICY";
pub const ENV_PERIOD: &str = "SMARTSTOCK_PERIOD";
pub const ENV_PERIOD_COLUMN: &str = "SMARTSTOCK_PERIOD_COLUMN";

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceConfig {
    pub threshold: Threshold,
    pub unmatched_policy: UnmatchedPolicy,
    pub period: PeriodSelection,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::DEFAULT,
            unmatched_policy: UnmatchedPolicy::Skip,
            period: PeriodSelection::Latest,
        }
    }
}

impl RebalanceConfig {
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_unmatched_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched_policy = policy;
        self
    }

    pub fn with_period(mut self, period: PeriodSelection) -> Self {
        self.period = period;
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_THRESHOLD) {
            let value: f64 = raw.trim().parse().map_err(|e| {
                EngineError::invalid_input(format!("{ENV_THRESHOLD}={raw:?}: {e}"))
            })?;
            cfg.threshold = Threshold::new(value).map_err(|e| {
                EngineError::invalid_input(format!("{ENV_THRESHOLD}={raw:?}: {e}"))
            })?;
        }

        if let Some(raw) = lookup(ENV_UNMATCHED_POLICY) {
            cfg.unmatched_policy = raw.parse().map_err(|e| {
                EngineError::invalid_input(format!("{ENV_UNMATCHED_POLICY}={raw:?}: {e}"))
            })?;
        }

        if let Some(raw) = lookup(ENV_PERIOD) {
            let raw = raw.trim();
            cfg.period = if raw.eq_ignore_ascii_case("latest") {
                PeriodSelection::Latest
            } else {
                let p: i64 = raw.parse().map_err(|e| {
                    EngineError::invalid_input(format!("{ENV_PERIOD}={raw:?}: {e}"))
                })?;
                PeriodSelection::Period(p)
            };
        }

        Ok(cfg)
    }
}
