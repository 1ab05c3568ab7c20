//! API Gateway proxy envelopes.
//!
//! The hosting harness hands the service a REST proxy event and expects a
//! proxy response back. Only the fields the router needs are modelled;
//! everything else in the event is ignored during deserialization.

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Inbound proxy event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// HTTP method, e.g. `GET`.
    #[serde(default)]
    pub http_method: String,
    /// Request path, e.g. `/product`.
    #[serde(default)]
    pub path: String,
    /// Decoded query string parameters; `null` when the request had none.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Raw request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64-encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    /// Create an event with the given method and path and nothing else.
    #[must_use]
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Builder-style query parameter setter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builder-style body setter.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a single query string parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }

    /// The request body as text, decoding base64 when flagged.
    ///
    /// Returns `Ok(None)` when the event carries no body.
    pub fn body_text(&self) -> Result<Option<String>, InventoryError> {
        let Some(body) = &self.body else {
            return Ok(None);
        };

        if !self.is_base64_encoded {
            return Ok(Some(body.clone()));
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| {
                InventoryError::serialization_exception(format!("Invalid base64 body: {e}"))
            })?;
        String::from_utf8(decoded)
            .map(Some)
            .map_err(|e| InventoryError::serialization_exception(format!("Body is not UTF-8: {e}")))
    }
}

/// Outbound proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// JSON-serialized body; absent when there is nothing to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ProxyResponse {
    /// The status code as an [`http::StatusCode`].
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        http::StatusCode::from_u16(self.status_code)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Parse the body back into JSON, for callers that inspect responses.
    #[must_use]
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}
