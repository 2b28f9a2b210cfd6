use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use smartstock_core::{PlanId, ProductId, StoreId};
use smartstock_inventory::{Threshold, TransferFilter, TransferRecord, UnmatchedTransfer};

use crate::table;

/// Outcome of one rebalancing run, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceReport {
    pub plan_id: PlanId,
    pub generated_at: DateTime<Utc>,
    /// Period the plan was computed for.
    pub period: i64,
    pub threshold: Threshold,
    pub transfers: Vec<TransferRecord>,
    /// Percentage of rows with stock covering forecast, before transfers.
    pub availability_before: f64,
    /// Same metric on the simulated post-transfer snapshot.
    pub availability_after: f64,
    /// Transfer sides that named a (store, product) absent from the snapshot.
    pub unmatched: Vec<UnmatchedTransfer>,
    /// Sorted, distinct stores of the evaluated snapshot (filter choices).
    pub stores: Vec<StoreId>,
    /// Sorted, distinct products of the evaluated snapshot (filter choices).
    pub products: Vec<ProductId>,
}

impl RebalanceReport {
    pub fn units_moved(&self) -> u64 {
        self.transfers.iter().map(|t| t.quantity).sum()
    }

    pub fn filtered_transfers(&self, filter: &TransferFilter) -> Vec<&TransferRecord> {
        filter.apply(&self.transfers)
    }

    /// Transfer list in the canonical table shape.
    pub fn transfer_table(&self) -> serde_json::Result<Vec<JsonValue>> {
        table::transfer_rows(&self.transfers)
    }

    /// Compact metadata payload for logs and dashboards.
    pub fn summary(&self) -> JsonValue {
        json!({
            "kind": "inventory.rebalance",
            "plan_id": self.plan_id.to_string(),
            "generated_at": self.generated_at.to_rfc3339(),
            "period": self.period,
            "threshold": self.threshold.value(),
            "transfers": self.transfers.len(),
            "units_moved": self.units_moved(),
            "availability_before": self.availability_before,
            "availability_after": self.availability_after,
            "unmatched": self.unmatched.len(),
        })
    }
}
