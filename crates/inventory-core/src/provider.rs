//! Inventory provider implementing every product operation.

use std::sync::Arc;

use tracing::{debug, info};

use inventory_model::InventoryError;
use inventory_model::Product;
use inventory_model::input::{
    DeleteProductInput, GetProductInput, ModifyProductInput, SaveProductInput,
};
use inventory_model::output::{ListProductsOutput, WriteKind, WriteOutput};

use crate::gateway::StoreGateway;
use crate::retry::RetryPolicy;
use crate::store::ProductStore;

/// Product operations on top of the store gateway.
#[derive(Debug, Clone)]
pub struct InventoryProvider {
    gateway: StoreGateway,
}

impl InventoryProvider {
    /// Create a provider using the given gateway.
    #[must_use]
    pub fn new(gateway: StoreGateway) -> Self {
        Self { gateway }
    }

    /// Create a provider directly over a store.
    #[must_use]
    pub fn from_store(store: Arc<dyn ProductStore>, retry: RetryPolicy) -> Self {
        Self::new(StoreGateway::new(store, retry))
    }

    /// Handle `GET /product`. `None` when no such product exists.
    pub async fn handle_get_product(
        &self,
        input: GetProductInput,
    ) -> Result<Option<Product>, InventoryError> {
        let product = self.gateway.get_by_key(&input.product_id).await?;
        debug!(
            product_id = %input.product_id,
            found = product.is_some(),
            "fetched product"
        );
        Ok(product)
    }

    /// Handle `GET /products`.
    pub async fn handle_list_products(&self) -> Result<ListProductsOutput, InventoryError> {
        let products = self.gateway.scan_all().await?;
        Ok(ListProductsOutput { products })
    }

    /// Handle `POST /product`. The payload is stored verbatim and echoed back.
    pub async fn handle_save_product(
        &self,
        input: SaveProductInput,
    ) -> Result<WriteOutput, InventoryError> {
        self.gateway.put_record(&input.product).await?;
        info!(product_id = ?input.product.id(), "saved product");
        Ok(WriteOutput::success(WriteKind::Save, input.product))
    }

    /// Handle `PATCH /product`. Reports only the changed attributes.
    pub async fn handle_modify_product(
        &self,
        input: ModifyProductInput,
    ) -> Result<WriteOutput, InventoryError> {
        let changed = self
            .gateway
            .update_field(&input.product_id, &input.update_key, &input.update_value)
            .await?;
        info!(
            product_id = %input.product_id,
            field = %input.update_key,
            "updated product"
        );
        Ok(WriteOutput::success(WriteKind::Update, changed))
    }

    /// Handle `DELETE /product`. Reports the deleted record.
    pub async fn handle_delete_product(
        &self,
        input: DeleteProductInput,
    ) -> Result<WriteOutput, InventoryError> {
        let deleted = self.gateway.delete_by_key(&input.product_id).await?;
        info!(product_id = %input.product_id, "deleted product");
        Ok(WriteOutput::success(WriteKind::Delete, deleted))
    }
}
