//! Inventory snapshot data model.

use serde::{Deserialize, Serialize};

use smartstock_core::{DomainError, DomainResult, ProductId, StoreId};

/// One (store, product) row: stock on hand plus the forecast it is measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub inventory: f64,
    pub forecasted_demand: f64,
}

impl InventoryRecord {
    /// Build a record, rejecting NaN/infinite quantities.
    pub fn new(
        store_id: impl Into<StoreId>,
        product_id: impl Into<ProductId>,
        inventory: f64,
        forecasted_demand: f64,
    ) -> DomainResult<Self> {
        let record = Self {
            store_id: store_id.into(),
            product_id: product_id.into(),
            inventory,
            forecasted_demand,
        };
        record.validate()?;
        Ok(record)
    }

    /// Signed gap: negative means deficit, positive means surplus.
    pub fn gap(&self) -> f64 {
        self.inventory - self.forecasted_demand
    }

    /// Whether stock on hand covers the forecast.
    pub fn is_available(&self) -> bool {
        self.inventory >= self.forecasted_demand
    }

    fn validate(&self) -> DomainResult<()> {
        if !self.inventory.is_finite() {
            return Err(DomainError::malformed(format!(
                "store {} / product {}: inventory must be finite (got {})",
                self.store_id, self.product_id, self.inventory
            )));
        }
        if !self.forecasted_demand.is_finite() {
            return Err(DomainError::malformed(format!(
                "store {} / product {}: forecasted_demand must be finite (got {})",
                self.store_id, self.product_id, self.forecasted_demand
            )));
        }
        Ok(())
    }
}

/// Ordered rows for a single period.
///
/// Row order is significant: it is the tie-break for allocation and the
/// first-match order for simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<InventoryRecord>,
}

impl Snapshot {
    /// Build a snapshot, validating every row.
    ///
    /// Duplicate (store, product) rows are accepted; consumers resolve them by
    /// first occurrence.
    pub fn new(records: Vec<InventoryRecord>) -> DomainResult<Self> {
        for (idx, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|e| e.with_context(format_args!("row {idx}")))?;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<InventoryRecord> {
        self.records
    }

    /// Row index of the first record for (store, product), if any.
    pub fn find(&self, store_id: &StoreId, product_id: &ProductId) -> Option<usize> {
        self.records
            .iter()
            .position(|r| &r.store_id == store_id && &r.product_id == product_id)
    }

    /// Sorted, distinct store ids.
    pub fn stores(&self) -> Vec<StoreId> {
        let mut ids: Vec<StoreId> = self.records.iter().map(|r| r.store_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Sorted, distinct product ids.
    pub fn products(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.records.iter().map(|r| r.product_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn total_inventory(&self) -> f64 {
        self.records.iter().map(|r| r.inventory).sum()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [InventoryRecord] {
        &mut self.records
    }
}

/// Which period of a multi-period table to rebalance.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSelection {
    #[default]
    Latest,
    Period(i64),
}

/// Rows across several periods (e.g. one per day), before a single period is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicInventory {
    rows: Vec<(i64, InventoryRecord)>,
}

impl PeriodicInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, period: i64, record: InventoryRecord) {
        self.rows.push((period, record));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest_period(&self) -> Option<i64> {
        self.rows.iter().map(|(p, _)| *p).max()
    }

    /// Rows of `period`, in original order.
    pub fn snapshot_for(&self, period: i64) -> DomainResult<Snapshot> {
        if self.rows.is_empty() {
            return Err(DomainError::empty_snapshot());
        }
        let records: Vec<InventoryRecord> = self
            .rows
            .iter()
            .filter(|(p, _)| *p == period)
            .map(|(_, r)| r.clone())
            .collect();
        if records.is_empty() {
            return Err(DomainError::malformed(format!(
                "no rows for period {period}"
            )));
        }
        Snapshot::new(records)
    }

    pub fn latest_snapshot(&self) -> DomainResult<Snapshot> {
        let period = self.latest_period().ok_or(DomainError::EmptySnapshot)?;
        self.snapshot_for(period)
    }

    /// Resolve a selection to a concrete period and its snapshot.
    pub fn select(&self, selection: PeriodSelection) -> DomainResult<(i64, Snapshot)> {
        let period = match selection {
            PeriodSelection::Latest => self.latest_period().ok_or(DomainError::EmptySnapshot)?,
            PeriodSelection::Period(p) => p,
        };
        Ok((period, self.snapshot_for(period)?))
    }
}

impl FromIterator<(i64, InventoryRecord)> for PeriodicInventory {
    fn from_iter<I: IntoIterator<Item = (i64, InventoryRecord)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
