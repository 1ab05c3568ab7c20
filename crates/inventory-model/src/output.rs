//! Success payloads returned by the write and list operations.

use serde::{Deserialize, Serialize};

use crate::value::Product;

/// Message reported by every successful write.
pub const SUCCESS_MESSAGE: &str = "SUCCESS";

/// Kind of write reported in a [`WriteOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WriteKind {
    /// Create or replace.
    Save,
    /// Single-field update.
    Update,
    /// Delete.
    Delete,
}

/// Body of a successful create, update or delete.
///
/// ```json
/// {"Operation": "UPDATE", "Message": "SUCCESS", "Item": {"price": 12.5}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteOutput {
    /// Which write happened.
    pub operation: WriteKind,
    /// Always [`SUCCESS_MESSAGE`].
    pub message: String,
    /// The saved payload, the changed attributes, or the deleted record.
    pub item: Product,
}

impl WriteOutput {
    /// Successful write of the given kind.
    #[must_use]
    pub fn success(operation: WriteKind, item: Product) -> Self {
        Self {
            operation,
            message: SUCCESS_MESSAGE.to_owned(),
            item,
        }
    }
}

/// Body of `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListProductsOutput {
    /// Every stored product, in store order.
    pub products: Vec<Product>,
}
