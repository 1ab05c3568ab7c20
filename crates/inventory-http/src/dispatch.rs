//! Product handler trait and event dispatch.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use inventory_model::{InventoryError, ProductOperation, ProxyRequest, ProxyResponse};

use crate::response::{error_to_response, not_found_response};
use crate::router::resolve_operation;

/// Default deadline for one invocation.
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on request bodies accepted in local mode, matching the Lambda
/// synchronous payload limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Trait that the product business logic must implement.
///
/// The handler receives an already-routed operation and the full event, and
/// returns a complete response envelope. Errors are converted to error
/// envelopes by [`dispatch_event`].
pub trait ProductHandler: Send + Sync + 'static {
    /// Handle one routed operation.
    fn handle_operation(
        &self,
        op: ProductOperation,
        request: ProxyRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProxyResponse, InventoryError>> + Send>>;
}

/// Dispatch configuration shared by the Lambda and local HTTP entry points.
#[derive(Debug, Clone)]
pub struct InventoryHttpConfig {
    /// Overall deadline for a single invocation.
    pub invocation_timeout: Duration,
    /// Largest request body the local server buffers.
    pub max_body_bytes: usize,
}

impl Default for InventoryHttpConfig {
    fn default() -> Self {
        Self {
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Route one event and produce exactly one response.
///
/// Unrouted requests get the not-found response without touching the
/// handler. Every routed operation runs under the configured invocation
/// timeout, and any error becomes an error envelope.
pub async fn dispatch_event<H: ProductHandler + ?Sized>(
    handler: &H,
    request: ProxyRequest,
    config: &InventoryHttpConfig,
) -> ProxyResponse {
    let started = Instant::now();
    debug!(method = %request.http_method, path = %request.path, "received request event");

    let Some(op) = resolve_operation(&request.http_method, &request.path) else {
        info!(
            method = %request.http_method,
            path = %request.path,
            "no route matched, returning not-found",
        );
        return not_found_response();
    };

    let result =
        tokio::time::timeout(config.invocation_timeout, handler.handle_operation(op, request))
            .await
            .unwrap_or_else(|_| {
                Err(InventoryError::timeout(format!(
                    "{op} did not complete within {} ms",
                    config.invocation_timeout.as_millis()
                )))
            });

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!(operation = %op, code = %err.code, error = %err.message, "operation failed");
            error_to_response(&err)
        }
    };

    info!(
        operation = %op,
        write = op.is_write(),
        status = response.status_code,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed",
    );

    response
}
