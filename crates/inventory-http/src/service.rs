//! Inventory HTTP service implementing the hyper `Service` trait.
//!
//! Used by the local server mode: each plain HTTP request is turned into the
//! same proxy event the Lambda harness would deliver, dispatched, and the
//! resulting envelope is written back as an HTTP response.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;

use inventory_model::{InventoryError, ProxyRequest, ProxyResponse};

use crate::body::InventoryResponseBody;
use crate::dispatch::{InventoryHttpConfig, ProductHandler, dispatch_event};
use crate::response::{CONTENT_TYPE, error_to_response};

/// Hyper `Service` implementation for the inventory API.
#[derive(Debug)]
pub struct InventoryHttpService<H: ProductHandler> {
    handler: Arc<H>,
    config: Arc<InventoryHttpConfig>,
}

impl<H: ProductHandler> InventoryHttpService<H> {
    /// Create a new `InventoryHttpService`.
    pub fn new(handler: Arc<H>, config: InventoryHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: ProductHandler> Clone for InventoryHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: ProductHandler> hyper::service::Service<http::Request<Incoming>>
    for InventoryHttpService<H>
{
    type Response = http::Response<InventoryResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let (parts, incoming) = req.into_parts();
            let envelope = match collect_body(incoming, config.max_body_bytes).await {
                Ok(body) => {
                    let event = to_proxy_request(&parts, &body);
                    dispatch_event(handler.as_ref(), event, &config).await
                }
                Err(err) => error_to_response(&err),
            };
            Ok(to_http_response(envelope, &request_id))
        })
    }
}

/// Collect the incoming body into a single `Bytes` buffer of at most `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, InventoryError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                InventoryError::request_too_large(limit)
            } else {
                InventoryError::internal_error(format!("Failed to read request body: {e}"))
            }
        })
}

/// Build the proxy event for a plain HTTP request.
///
/// Empty bodies become `null`. Non-UTF-8 bodies are passed on base64-encoded
/// so that the handler reports them the same way the Lambda path would.
#[must_use]
pub fn to_proxy_request(parts: &http::request::Parts, body: &[u8]) -> ProxyRequest {
    let query = parts.uri.query().map(parse_query).filter(|q| !q.is_empty());

    let (body, is_base64_encoded) = if body.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(body) {
            Ok(text) => (Some(text.to_owned()), false),
            Err(_) => (Some(BASE64_STANDARD.encode(body)), true),
        }
    };

    ProxyRequest {
        http_method: parts.method.as_str().to_owned(),
        path: parts.uri.path().to_owned(),
        query_string_parameters: query,
        body,
        is_base64_encoded,
    }
}

/// Parse a raw query string into decoded key/value pairs.
///
/// Like API Gateway, a repeated key keeps its last value.
#[must_use]
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(k)?;
            let value = decode_component(v)?;
            Some((key, value))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    let raw = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&raw)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Convert an envelope into an HTTP response.
#[must_use]
pub fn to_http_response(
    envelope: ProxyResponse,
    request_id: &str,
) -> http::Response<InventoryResponseBody> {
    let status = envelope.status();
    let mut response = http::Response::new(InventoryResponseBody::from_envelope(envelope.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers
        .entry("content-type")
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));

    headers.insert("server", http::HeaderValue::from_static("products-inventory"));

    response
}
