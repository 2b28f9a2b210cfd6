//! Greedy per-product transfer allocation.
//!
//! For each product, deficit rows (most deficient first) are serviced from
//! surplus rows (largest surplus first). Working gaps live in local slot lists
//! indexed by row, so the snapshot itself is never touched.
//!
//! Products are visited in sorted id order; within a product, transfers are
//! emitted in needy order, then donor order.

use std::collections::BTreeMap;

use tracing::debug;

use smartstock_core::ProductId;

use crate::gap::{GapClass, Threshold};
use crate::snapshot::Snapshot;
use crate::transfer::TransferRecord;

/// Row index plus its working gap for the current allocation pass.
#[derive(Debug, Copy, Clone)]
struct Slot {
    row: usize,
    gap: f64,
}

/// Compute transfers that move surplus stock toward deficits.
///
/// Never fails: products without both a needy and a surplus row contribute
/// nothing, and an empty result means no transfer is warranted.
pub fn allocate(snapshot: &Snapshot, threshold: Threshold) -> Vec<TransferRecord> {
    let mut rows_by_product: BTreeMap<&ProductId, Vec<usize>> = BTreeMap::new();
    for (row, record) in snapshot.iter().enumerate() {
        rows_by_product.entry(&record.product_id).or_default().push(row);
    }

    let mut transfers = Vec::new();
    for (product_id, rows) in rows_by_product {
        let before = transfers.len();
        allocate_product(snapshot, product_id, &rows, threshold, &mut transfers);
        let emitted = transfers.len() - before;
        if emitted > 0 {
            debug!(product = %product_id, transfers = emitted, "allocated product");
        }
    }
    transfers
}

fn allocate_product(
    snapshot: &Snapshot,
    product_id: &ProductId,
    rows: &[usize],
    threshold: Threshold,
    out: &mut Vec<TransferRecord>,
) {
    let records = snapshot.records();
    let t = threshold.value();

    let slots = rows.iter().map(|&row| Slot {
        row,
        gap: records[row].gap(),
    });
    let (mut needs, mut surplus): (Vec<Slot>, Vec<Slot>) = slots
        .filter(|s| threshold.classify(s.gap) != GapClass::Balanced)
        .partition(|s| threshold.classify(s.gap) == GapClass::Deficit);

    if needs.is_empty() || surplus.is_empty() {
        return;
    }

    // Stable sorts: equal gaps keep row order.
    needs.sort_by(|a, b| a.gap.total_cmp(&b.gap));
    surplus.sort_by(|a, b| b.gap.total_cmp(&a.gap));

    for need in needs.iter_mut() {
        for donor in surplus.iter_mut() {
            // A donor drained into the band is no longer surplus.
            if donor.gap <= t {
                continue;
            }
            // Duplicate rows for one store can sit on both sides.
            if records[donor.row].store_id == records[need.row].store_id {
                continue;
            }
            let qty = (-need.gap).min(donor.gap);
            if qty <= 0.0 {
                continue;
            }

            let units = qty.floor();
            if units >= 1.0 {
                out.push(TransferRecord {
                    product_id: product_id.clone(),
                    from_store_id: records[donor.row].store_id.clone(),
                    to_store_id: records[need.row].store_id.clone(),
                    quantity: units as u64,
                });
            }

            donor.gap -= qty;
            need.gap += qty;
            if need.gap >= -t {
                break;
            }
        }
    }
}
