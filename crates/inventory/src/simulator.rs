//! Apply transfer instructions to a copy of a snapshot.

use core::str::FromStr;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use smartstock_core::{DomainError, DomainResult, ProductId, StoreId};

use crate::snapshot::Snapshot;
use crate::transfer::TransferRecord;

/// What to do when a transfer names a (store, product) pair the snapshot lacks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Skip the missing side, record it, and keep going.
    #[default]
    Skip,
    /// Fail the whole simulation.
    Reject,
}

impl FromStr for UnmatchedPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(DomainError::malformed(format!(
                "unknown unmatched policy `{other}` (expected `skip` or `reject`)"
            ))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferSide {
    Source,
    Destination,
}

/// One half of a transfer that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedTransfer {
    /// Position of the transfer in the input list.
    pub transfer_index: usize,
    pub side: TransferSide,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: u64,
}

impl core::fmt::Display for UnmatchedTransfer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let side = match self.side {
            TransferSide::Source => "source",
            TransferSide::Destination => "destination",
        };
        write!(
            f,
            "transfer #{}: {side} store {} has no row for product {}",
            self.transfer_index, self.store_id, self.product_id
        )
    }
}

/// Post-transfer snapshot plus every side that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub snapshot: Snapshot,
    pub unmatched: Vec<UnmatchedTransfer>,
}

/// Apply `transfers` in order to a copy of `base`.
///
/// Each side adjusts the first row (by row order) matching its (store, product).
/// `base` is left untouched. Under [`UnmatchedPolicy::Reject`] the first missing
/// side aborts the run and no snapshot is returned.
pub fn simulate(
    base: &Snapshot,
    transfers: &[TransferRecord],
    policy: UnmatchedPolicy,
) -> DomainResult<Simulation> {
    let mut first_row: HashMap<(&StoreId, &ProductId), usize> = HashMap::with_capacity(base.len());
    for (row, record) in base.iter().enumerate() {
        first_row
            .entry((&record.store_id, &record.product_id))
            .or_insert(row);
    }

    let mut snapshot = base.clone();
    let mut unmatched = Vec::new();

    for (transfer_index, transfer) in transfers.iter().enumerate() {
        let qty = transfer.quantity as f64;
        let sides = [
            (TransferSide::Source, &transfer.from_store_id, -qty),
            (TransferSide::Destination, &transfer.to_store_id, qty),
        ];

        for (side, store_id, delta) in sides {
            match first_row.get(&(store_id, &transfer.product_id)) {
                Some(&row) => snapshot.records_mut()[row].inventory += delta,
                None => {
                    let miss = UnmatchedTransfer {
                        transfer_index,
                        side,
                        store_id: store_id.clone(),
                        product_id: transfer.product_id.clone(),
                        quantity: transfer.quantity,
                    };
                    if policy == UnmatchedPolicy::Reject {
                        return Err(DomainError::unmatched(miss.to_string()));
                    }
                    warn!(
                        transfer = transfer_index,
                        store = %miss.store_id,
                        product = %miss.product_id,
                        side = ?miss.side,
                        "skipping unmatched transfer side"
                    );
                    unmatched.push(miss);
                }
            }
        }
    }

    Ok(Simulation {
        snapshot,
        unmatched,
    })
}
