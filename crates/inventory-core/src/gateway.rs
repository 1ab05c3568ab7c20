//! Store gateway: retrying access to the product store.
//!
//! Every call runs under the configured [`RetryPolicy`]. Failures that survive
//! the policy are logged and converted into [`InventoryError`]s.

use std::sync::Arc;

use tracing::error;

use inventory_model::{FieldValue, InventoryError, Product};

use crate::error::store_error_to_inventory;
use crate::retry::RetryPolicy;
use crate::store::{ContinuationToken, ProductStore, ScanPage, StoreError};

/// Retrying front for a [`ProductStore`].
#[derive(Debug, Clone)]
pub struct StoreGateway {
    store: Arc<dyn ProductStore>,
    retry: RetryPolicy,
}

impl StoreGateway {
    /// Create a gateway over a shared store.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Fetch one record. An absent record is not an error.
    pub async fn get_by_key(&self, product_id: &str) -> Result<Option<Product>, InventoryError> {
        let result = self
            .retry
            .run("GetItem", move || self.store.get(product_id))
            .await;
        finish("GetItem", result)
    }

    /// Fetch one scan page.
    pub async fn scan_page(
        &self,
        token: Option<&ContinuationToken>,
    ) -> Result<ScanPage, InventoryError> {
        let result = self.retry.run("Scan", move || self.store.scan_page(token)).await;
        finish("Scan", result)
    }

    /// Unconditional upsert; the last write wins.
    pub async fn put_record(&self, product: &Product) -> Result<(), InventoryError> {
        let result = self.retry.run("PutItem", move || self.store.put(product)).await;
        finish("PutItem", result)
    }

    /// Set one attribute on an existing record, returning the changed attributes.
    pub async fn update_field(
        &self,
        product_id: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Product, InventoryError> {
        let result = self
            .retry
            .run("UpdateItem", move || {
                self.store.update_field(product_id, field, value)
            })
            .await;
        finish("UpdateItem", result)
    }

    /// Delete an existing record, returning its pre-deletion snapshot.
    ///
    /// The delete is conditional on the record existing, so a repeat of an
    /// applied attempt would report the record as missing. Only attempts the
    /// store rejected outright are retried.
    pub async fn delete_by_key(&self, product_id: &str) -> Result<Product, InventoryError> {
        let result = self
            .retry
            .run_once_applied("DeleteItem", move || self.store.delete(product_id))
            .await;
        finish("DeleteItem", result)
    }
}

fn finish<T>(operation: &str, result: Result<T, StoreError>) -> Result<T, InventoryError> {
    result.map_err(|e| {
        if !matches!(e, StoreError::NotFound { .. }) {
            error!(operation, error = %e, "store operation failed");
        }
        store_error_to_inventory(e)
    })
}
