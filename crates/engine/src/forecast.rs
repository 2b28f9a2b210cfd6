//! Forecasting collaborator seam.
//!
//! The demand model is opaque: it receives stock levels and returns one
//! forecasted demand per row. [`CachedForecaster`] memoizes model output keyed
//! by a content hash of the input rows.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use smartstock_core::{DomainError, ProductId, StoreId};
use smartstock_inventory::{InventoryRecord, Snapshot};

use crate::error::EngineError;

/// Stock on hand for one (store, product), before a forecast is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub inventory: f64,
}

impl StockLevel {
    pub fn new(store_id: impl Into<StoreId>, product_id: impl Into<ProductId>, inventory: f64) -> Self {
        Self {
            store_id: store_id.into(),
            product_id: product_id.into(),
            inventory,
        }
    }
}

/// Produces forecasted demand, one value per input row, in input order.
pub trait DemandForecaster: Send + Sync {
    fn forecast(&self, levels: &[StockLevel]) -> Result<Vec<f64>, EngineError>;
}

impl<F> DemandForecaster for F
where
    F: Fn(&[StockLevel]) -> Result<Vec<f64>, EngineError> + Send + Sync,
{
    fn forecast(&self, levels: &[StockLevel]) -> Result<Vec<f64>, EngineError> {
        self(levels)
    }
}

/// Run `forecaster` and join its output onto the stock levels.
pub fn attach_forecasts<F>(forecaster: &F, levels: &[StockLevel]) -> Result<Snapshot, EngineError>
where
    F: DemandForecaster + ?Sized,
{
    let forecasts = forecaster.forecast(levels)?;
    if forecasts.len() != levels.len() {
        return Err(DomainError::malformed(format!(
            "forecaster returned {} values for {} rows",
            forecasts.len(),
            levels.len()
        ))
        .into());
    }

    let records = levels
        .iter()
        .zip(forecasts)
        .map(|(level, demand)| {
            InventoryRecord::new(
                level.store_id.clone(),
                level.product_id.clone(),
                level.inventory,
                demand,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Snapshot::new(records)?)
}

/// Stable content hash of a batch of stock levels.
pub fn content_hash(levels: &[StockLevel]) -> u64 {
    let mut hasher = DefaultHasher::new();
    levels.len().hash(&mut hasher);
    for level in levels {
        level.store_id.hash(&mut hasher);
        level.product_id.hash(&mut hasher);
        level.inventory.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Memoizing wrapper: identical input batches reuse the previous forecast.
#[derive(Debug)]
pub struct CachedForecaster<F> {
    inner: F,
    cache: Mutex<HashMap<u64, Vec<f64>>>,
}

impl<F: DemandForecaster> CachedForecaster<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<F: DemandForecaster> DemandForecaster for CachedForecaster<F> {
    fn forecast(&self, levels: &[StockLevel]) -> Result<Vec<f64>, EngineError> {
        let key = content_hash(levels);
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(hit.clone());
        }

        // Lock is not held across the model call.
        let fresh = self.inner.forecast(levels)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, fresh.clone());
        Ok(fresh)
    }
}
