//! Availability metric: share of rows whose stock covers the forecast.

use serde::{Deserialize, Serialize};

use smartstock_core::{DomainError, DomainResult};

use crate::snapshot::Snapshot;

/// Percentage in [0, 100] of rows with `inventory >= forecasted_demand`.
///
/// An empty snapshot has no defined availability and yields
/// [`DomainError::EmptySnapshot`].
pub fn availability(snapshot: &Snapshot) -> DomainResult<f64> {
    if snapshot.is_empty() {
        return Err(DomainError::empty_snapshot());
    }
    let available = snapshot.iter().filter(|r| r.is_available()).count();
    Ok(100.0 * available as f64 / snapshot.len() as f64)
}

/// Availability before and after a transfer plan.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityDelta {
    pub before: f64,
    pub after: f64,
}

impl AvailabilityDelta {
    pub fn compare(before: &Snapshot, after: &Snapshot) -> DomainResult<Self> {
        Ok(Self {
            before: availability(before)?,
            after: availability(after)?,
        })
    }

    /// Percentage points gained (negative if the plan made things worse).
    pub fn improvement(&self) -> f64 {
        self.after - self.before
    }
}
