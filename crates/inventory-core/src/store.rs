//! Product store abstraction.
//!
//! A [`ProductStore`] issues exactly one request against its backend per call.
//! Retrying, error mapping and page accumulation live above it in the
//! [`StoreGateway`](crate::gateway::StoreGateway).

use thiserror::Error;

use inventory_model::{FieldValue, Fields, KEY_ATTRIBUTE, Product};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write found no record with the given key.
    #[error("product not found: {product_id}")]
    NotFound {
        /// The missing key.
        product_id: String,
    },
    /// The request was rejected before being applied (throttling, limits).
    #[error("{operation} failed transiently: {message}")]
    Transient {
        /// Store operation name.
        operation: &'static str,
        /// Backend error description.
        message: String,
    },
    /// The request may or may not have been applied (timeout, lost response,
    /// server-side fault).
    #[error("{operation} outcome unknown: {message}")]
    Indeterminate {
        /// Store operation name.
        operation: &'static str,
        /// Backend error description.
        message: String,
    },
    /// A failure that will not go away on retry.
    #[error("{operation} failed: {message}")]
    Permanent {
        /// Store operation name.
        operation: &'static str,
        /// Backend error description.
        message: String,
    },
    /// The backend returned or was handed an item it cannot represent.
    #[error("invalid item: {0}")]
    InvalidItem(String),
}

impl StoreError {
    /// Whether the failed call was certainly not applied and may be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Whether the failed call may be retried when repeating it is harmless.
    #[must_use]
    pub fn is_retryable_if_idempotent(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Indeterminate { .. })
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Opaque scan continuation token: the last evaluated key of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(Fields);

impl ContinuationToken {
    /// Wrap a last evaluated key.
    #[must_use]
    pub fn new(key: Fields) -> Self {
        Self(key)
    }

    /// Token pointing just after the product with the given key.
    #[must_use]
    pub fn after(product_id: &str) -> Self {
        let mut key = Fields::new();
        key.insert(KEY_ATTRIBUTE.to_owned(), FieldValue::from(product_id));
        Self(key)
    }

    /// The key attribute carried by the token, if it is a string.
    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.0.get(KEY_ATTRIBUTE).and_then(FieldValue::as_str)
    }

    /// The raw last evaluated key.
    #[must_use]
    pub fn key(&self) -> &Fields {
        &self.0
    }
}

/// One page of scan results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    /// Records in store order.
    pub items: Vec<Product>,
    /// Present when more records follow.
    pub next_token: Option<ContinuationToken>,
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Single-request access to the product table.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync + std::fmt::Debug {
    /// Fetch one record by key. An absent record is `Ok(None)`.
    async fn get(&self, product_id: &str) -> Result<Option<Product>, StoreError>;

    /// Fetch one page of the full-table scan.
    async fn scan_page(&self, token: Option<&ContinuationToken>) -> Result<ScanPage, StoreError>;

    /// Create or replace a record.
    async fn put(&self, product: &Product) -> Result<(), StoreError>;

    /// Set one attribute on an existing record, returning the changed attributes.
    async fn update_field(
        &self,
        product_id: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Product, StoreError>;

    /// Delete an existing record, returning its last contents.
    async fn delete(&self, product_id: &str) -> Result<Product, StoreError>;
}
