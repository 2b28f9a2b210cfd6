//! Gap calculation and classification against the surplus/deficit band.

use serde::{Deserialize, Serialize};

use smartstock_core::{DomainError, DomainResult};

use crate::snapshot::Snapshot;

/// Half-width of the band within which a gap counts as balanced.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(3.0);

    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::malformed(format!(
                "threshold must be a finite non-negative number (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn classify(self, gap: f64) -> GapClass {
        if gap < -self.0 {
            GapClass::Deficit
        } else if gap > self.0 {
            GapClass::Surplus
        } else {
            GapClass::Balanced
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClass {
    /// Below the band: needs stock.
    Deficit,
    Balanced,
    /// Above the band: can donate.
    Surplus,
}

/// Gap for every row, in row order.
pub fn gaps(snapshot: &Snapshot) -> Vec<f64> {
    snapshot.iter().map(|r| r.gap()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InventoryRecord;

    #[test]
    fn band_edges_are_balanced() {
        let t = Threshold::DEFAULT;
        assert_eq!(t.classify(-3.0), GapClass::Balanced);
        assert_eq!(t.classify(3.0), GapClass::Balanced);
        assert_eq!(t.classify(-3.01), GapClass::Deficit);
        assert_eq!(t.classify(3.01), GapClass::Surplus);
    }

    #[test]
    fn zero_threshold_still_separates_signs() {
        let t = Threshold::new(0.0).unwrap();
        assert_eq!(t.classify(0.0), GapClass::Balanced);
        assert_eq!(t.classify(-0.5), GapClass::Deficit);
        assert_eq!(t.classify(0.5), GapClass::Surplus);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(Threshold::new(-1.0).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn gaps_follow_row_order_and_leave_snapshot_untouched() {
        let snapshot = Snapshot::new(vec![
            InventoryRecord::new("A", "P", 10.0, 2.0).unwrap(),
            InventoryRecord::new("B", "P", 1.0, 6.0).unwrap(),
        ])
        .unwrap();
        let before = snapshot.clone();
        assert_eq!(gaps(&snapshot), vec![8.0, -5.0]);
        assert_eq!(snapshot, before);
    }
}
