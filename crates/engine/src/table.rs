//! Tabular boundary: map named-column rows onto canonical records.
//!
//! Rows arrive as JSON objects (one per table row). Column names are
//! configurable through [`ColumnMapping`]; anything missing, mistyped or
//! non-finite fails the whole table with a message naming row and column.

use serde_json::{Map, Value};

use smartstock_core::{DomainError, DomainResult, ProductId, StoreId};
use smartstock_inventory::{InventoryRecord, PeriodicInventory, TransferRecord};

use crate::config::ENV_PERIOD_COLUMN;
use crate::error::EngineError;

/// Default period column of snapshot tables.
pub const DEFAULT_PERIOD_COLUMN: &str = "day";

/// Source column names for each canonical snapshot field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub store_id: String,
    pub product_id: String,
    pub inventory: String,
    pub forecasted_demand: String,
    /// Period column; `None` treats the whole table as period 0.
    pub period: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            store_id: "store_id".to_string(),
            product_id: "product_id".to_string(),
            inventory: "inventory".to_string(),
            forecasted_demand: "forecasted_demand".to_string(),
            period: Some(DEFAULT_PERIOD_COLUMN.to_string()),
        }
    }
}

impl ColumnMapping {
    /// Default mapping with the period column taken from the environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default mapping, overriding the period column through `lookup`.
    ///
    /// `none` reads every row as period 0; a blank value is rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mapping = Self::default();
        let Some(raw) = lookup(ENV_PERIOD_COLUMN) else {
            return Ok(mapping);
        };
        match raw.trim() {
            "" => Err(EngineError::invalid_input(format!(
                "{ENV_PERIOD_COLUMN}={raw:?}: column name is blank"
            ))),
            column if column.eq_ignore_ascii_case("none") => Ok(mapping.without_period_column()),
            column => Ok(mapping.with_period_column(column)),
        }
    }

    pub fn with_period_column(mut self, column: impl Into<String>) -> Self {
        self.period = Some(column.into());
        self
    }

    /// Treat the whole table as a single period (0).
    pub fn without_period_column(mut self) -> Self {
        self.period = None;
        self
    }

    pub fn with_store_column(mut self, column: impl Into<String>) -> Self {
        self.store_id = column.into();
        self
    }

    pub fn with_product_column(mut self, column: impl Into<String>) -> Self {
        self.product_id = column.into();
        self
    }

    pub fn with_inventory_column(mut self, column: impl Into<String>) -> Self {
        self.inventory = column.into();
        self
    }

    pub fn with_demand_column(mut self, column: impl Into<String>) -> Self {
        self.forecasted_demand = column.into();
        self
    }
}

/// Parse snapshot rows into a (possibly multi-period) inventory table.
pub fn parse_rows(rows: &[Value], mapping: &ColumnMapping) -> DomainResult<PeriodicInventory> {
    let mut table = PeriodicInventory::new();
    for (idx, row) in rows.iter().enumerate() {
        let obj = as_object(idx, row)?;
        let store_id: StoreId = label(idx, obj, &mapping.store_id)?.into();
        let product_id: ProductId = label(idx, obj, &mapping.product_id)?.into();
        let inventory = number(idx, obj, &mapping.inventory)?;
        let forecasted_demand = number(idx, obj, &mapping.forecasted_demand)?;
        let period = match &mapping.period {
            Some(column) => integer(idx, obj, column)?,
            None => 0,
        };

        let record = InventoryRecord::new(store_id, product_id, inventory, forecasted_demand)
            .map_err(|e| e.with_context(format_args!("row {idx}")))?;
        table.push(period, record);
    }
    Ok(table)
}

/// Parse a transfer table (`product, from_store, to_store, quantity`).
pub fn parse_transfer_rows(rows: &[Value]) -> DomainResult<Vec<TransferRecord>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let obj = as_object(idx, row)?;
            let product = label(idx, obj, "product")?;
            let from = label(idx, obj, "from_store")?;
            let to = label(idx, obj, "to_store")?;
            let quantity = integer(idx, obj, "quantity")?;
            let quantity = u64::try_from(quantity).map_err(|_| {
                DomainError::malformed(format!(
                    "row {idx}: column `quantity` must be positive (got {quantity})"
                ))
            })?;
            TransferRecord::new(product, from, to, quantity)
                .map_err(|e| e.with_context(format_args!("row {idx}")))
        })
        .collect()
}

/// Canonical transfer table, one JSON object per transfer.
///
/// Column names come from `TransferRecord`'s serde attributes, the same
/// names [`parse_transfer_rows`] reads.
pub fn transfer_rows(transfers: &[TransferRecord]) -> serde_json::Result<Vec<Value>> {
    transfers.iter().map(serde_json::to_value).collect()
}

fn as_object(idx: usize, row: &Value) -> DomainResult<&Map<String, Value>> {
    row.as_object()
        .ok_or_else(|| DomainError::malformed(format!("row {idx}: expected an object")))
}

fn field<'a>(idx: usize, obj: &'a Map<String, Value>, column: &str) -> DomainResult<&'a Value> {
    match obj.get(column) {
        Some(Value::Null) | None => Err(DomainError::malformed(format!(
            "row {idx}: column `{column}` is missing"
        ))),
        Some(v) => Ok(v),
    }
}

/// Identifiers may be strings or integers.
fn label(idx: usize, obj: &Map<String, Value>, column: &str) -> DomainResult<String> {
    match field(idx, obj, column)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(DomainError::malformed(format!(
            "row {idx}: column `{column}` must be a non-empty string or integer (got {other})"
        ))),
    }
}

/// Quantities may be numbers or numeric strings; must be finite.
fn number(idx: usize, obj: &Map<String, Value>, column: &str) -> DomainResult<f64> {
    let value = match field(idx, obj, column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(DomainError::malformed(format!(
            "row {idx}: column `{column}` must be finite (got {v})"
        ))),
        None => Err(DomainError::malformed(format!(
            "row {idx}: column `{column}` is not numeric"
        ))),
    }
}

/// Whole numbers; integral floats (`3.0`) are accepted.
///
/// `i64::MAX as f64` rounds up to 2^63, which is already out of range.
fn integer(idx: usize, obj: &Map<String, Value>, column: &str) -> DomainResult<i64> {
    let v = number(idx, obj, column)?;
    if v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return Err(DomainError::malformed(format!(
            "row {idx}: column `{column}` must be a whole number (got {v})"
        )));
    }
    Ok(v as i64)
}
