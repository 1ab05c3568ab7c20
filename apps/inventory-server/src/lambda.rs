//! AWS Lambda entry point.
//!
//! Each invocation carries one API Gateway proxy event and returns one
//! envelope. Failures inside the handler are already turned into error
//! envelopes, so the function itself never reports an invocation error.

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::debug;

use inventory_core::InventoryHandler;
use inventory_http::{InventoryHttpConfig, dispatch_event};
use inventory_model::{ProxyRequest, ProxyResponse};

/// Serve invocations from the Lambda runtime API until the runtime stops.
pub async fn run(handler: Arc<InventoryHandler>, config: InventoryHttpConfig) -> Result<(), Error> {
    let config = Arc::new(config);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ProxyRequest>| {
        let handler = Arc::clone(&handler);
        let config = Arc::clone(&config);
        async move {
            debug!(request_id = %event.context.request_id, "lambda invocation");
            let response = dispatch_event(handler.as_ref(), event.payload, &config).await;
            Ok::<ProxyResponse, Error>(response)
        }
    }))
    .await
}
