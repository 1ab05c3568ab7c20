//! Inventory handler bridging HTTP dispatch to the provider.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use inventory_http::dispatch::ProductHandler;
use inventory_http::response::build_response;
use inventory_model::input::{
    DeleteProductInput, GetProductInput, ModifyProductInput, PRODUCT_ID_PARAM, SaveProductInput,
};
use inventory_model::{
    FieldValue, Fields, InventoryError, ProductOperation, ProxyRequest, ProxyResponse,
};

use crate::provider::InventoryProvider;

/// Handler that bridges the HTTP layer to the inventory provider.
#[derive(Debug)]
pub struct InventoryHandler {
    provider: Arc<InventoryProvider>,
}

impl InventoryHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<InventoryProvider>) -> Self {
        Self { provider }
    }
}

impl ProductHandler for InventoryHandler {
    fn handle_operation(
        &self,
        op: ProductOperation,
        request: ProxyRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProxyResponse, InventoryError>> + Send>> {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), op, &request).await })
    }
}

/// Dispatch an inventory operation to the appropriate provider method.
async fn dispatch(
    provider: &InventoryProvider,
    op: ProductOperation,
    request: &ProxyRequest,
) -> Result<ProxyResponse, InventoryError> {
    let ok = http::StatusCode::OK;

    match op {
        ProductOperation::HealthCheck => Ok(build_response::<()>(ok, None)),
        ProductOperation::GetProduct => {
            let input = GetProductInput::from_query(request.query_param(PRODUCT_ID_PARAM))?;
            let product = provider.handle_get_product(input).await?;
            Ok(build_response(ok, product.as_ref()))
        }
        ProductOperation::ListProducts => {
            let output = provider.handle_list_products().await?;
            Ok(build_response(ok, Some(&output)))
        }
        ProductOperation::SaveProduct => {
            let input = SaveProductInput::from_body(deserialize(request)?)?;
            let output = provider.handle_save_product(input).await?;
            Ok(build_response(ok, Some(&output)))
        }
        ProductOperation::ModifyProduct => {
            let input = ModifyProductInput::from_body(deserialize(request)?)?;
            let output = provider.handle_modify_product(input).await?;
            Ok(build_response(ok, Some(&output)))
        }
        ProductOperation::DeleteProduct => {
            let input = DeleteProductInput::from_body(&deserialize(request)?)?;
            let output = provider.handle_delete_product(input).await?;
            Ok(build_response(ok, Some(&output)))
        }
    }
}

/// Decode the request body into a JSON object.
fn deserialize(request: &ProxyRequest) -> Result<Fields, InventoryError> {
    let Some(text) = request.body_text()? else {
        return Err(InventoryError::validation("Request body is required"));
    };

    let value: FieldValue = serde_json::from_str(&text).map_err(|e| {
        InventoryError::serialization_exception(format!("Failed to deserialize request body: {e}"))
    })?;

    match value {
        FieldValue::Map(fields) => Ok(fields),
        other => Err(InventoryError::validation(format!(
            "Request body must be a JSON object, got {}",
            other.type_name()
        ))),
    }
}
