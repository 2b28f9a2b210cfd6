//! Transfer instructions and filtering.

use serde::{Deserialize, Serialize};

use smartstock_core::{DomainError, DomainResult, ProductId, StoreId};

/// A directed, product-scoped movement of whole units between two stores.
///
/// Serializes with the transfer table's column names
/// (`product, from_store, to_store, quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(rename = "product")]
    pub product_id: ProductId,
    #[serde(rename = "from_store")]
    pub from_store_id: StoreId,
    #[serde(rename = "to_store")]
    pub to_store_id: StoreId,
    pub quantity: u64,
}

impl TransferRecord {
    /// Build a transfer supplied from outside the allocator.
    pub fn new(
        product_id: impl Into<ProductId>,
        from_store_id: impl Into<StoreId>,
        to_store_id: impl Into<StoreId>,
        quantity: u64,
    ) -> DomainResult<Self> {
        let transfer = Self {
            product_id: product_id.into(),
            from_store_id: from_store_id.into(),
            to_store_id: to_store_id.into(),
            quantity,
        };
        if transfer.quantity == 0 {
            return Err(DomainError::malformed(format!(
                "transfer of {} from {} to {}: quantity must be positive",
                transfer.product_id, transfer.from_store_id, transfer.to_store_id
            )));
        }
        if transfer.from_store_id == transfer.to_store_id {
            return Err(DomainError::malformed(format!(
                "transfer of {}: source and destination are both {}",
                transfer.product_id, transfer.from_store_id
            )));
        }
        Ok(transfer)
    }

    pub fn touches_store(&self, store_id: &StoreId) -> bool {
        &self.from_store_id == store_id || &self.to_store_id == store_id
    }
}

/// Narrow a transfer list to one store (as source or destination) and/or one product.
///
/// `None` on either field means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferFilter {
    pub store: Option<StoreId>,
    pub product: Option<ProductId>,
}

impl TransferFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: impl Into<StoreId>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<ProductId>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn matches(&self, transfer: &TransferRecord) -> bool {
        let store_ok = self
            .store
            .as_ref()
            .is_none_or(|s| transfer.touches_store(s));
        let product_ok = self
            .product
            .as_ref()
            .is_none_or(|p| &transfer.product_id == p);
        store_ok && product_ok
    }

    pub fn apply<'a>(&self, transfers: &'a [TransferRecord]) -> Vec<&'a TransferRecord> {
        transfers.iter().filter(|t| self.matches(t)).collect()
    }
}
