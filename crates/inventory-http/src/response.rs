//! Response envelope building and error formatting.

use std::collections::BTreeMap;

use inventory_model::{InventoryError, ProxyResponse};

/// Content type of every response.
pub const CONTENT_TYPE: &str = "application/json";

/// Body of the catch-all route.
pub const NOT_FOUND_BODY: &str = "404 not-found";

/// Build a response envelope.
///
/// `None` produces an envelope without a body, which is how "nothing" is
/// serialized. Should serialization of `body` fail, a 500 envelope describing
/// the failure is returned instead.
#[must_use]
pub fn build_response<T: serde::Serialize + ?Sized>(
    status: http::StatusCode,
    body: Option<&T>,
) -> ProxyResponse {
    let body = match body.map(serde_json::to_string).transpose() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            let err = InventoryError::internal_error(format!("Failed to serialize response: {e}"));
            return error_to_response(&err);
        }
    };

    envelope(status, body)
}

/// Serialize an inventory error into a JSON body.
///
/// ```json
/// {"Error": "ProductNotFound", "Message": "Product not found: p1"}
/// ```
#[must_use]
pub fn error_to_json(error: &InventoryError) -> String {
    serde_json::json!({
        "Error": error.code.as_str(),
        "Message": error.message,
    })
    .to_string()
}

/// Convert an `InventoryError` into a complete error envelope.
#[must_use]
pub fn error_to_response(error: &InventoryError) -> ProxyResponse {
    envelope(error.status_code, Some(error_to_json(error)))
}

/// The catch-all response for unrouted requests.
#[must_use]
pub fn not_found_response() -> ProxyResponse {
    build_response(http::StatusCode::NOT_FOUND, Some(NOT_FOUND_BODY))
}

fn envelope(status: http::StatusCode, body: Option<String>) -> ProxyResponse {
    ProxyResponse {
        status_code: status.as_u16(),
        headers: BTreeMap::from([("Content-Type".to_owned(), CONTENT_TYPE.to_owned())]),
        body,
    }
}
