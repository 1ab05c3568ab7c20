//! Routed product operations.

use std::fmt;

/// Every action the request router can select.
///
/// The not-found fallback is not an operation: it is what the router returns
/// when no variant matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductOperation {
    /// Liveness probe.
    HealthCheck,
    /// Fetch one product by key.
    GetProduct,
    /// Fetch every product in the table.
    ListProducts,
    /// Create or replace a product.
    SaveProduct,
    /// Set one field on an existing product.
    ModifyProduct,
    /// Delete a product by key.
    DeleteProduct,
}

impl ProductOperation {
    /// All operations, in routing-table order.
    pub const ALL: [Self; 6] = [
        Self::HealthCheck,
        Self::GetProduct,
        Self::ListProducts,
        Self::SaveProduct,
        Self::ModifyProduct,
        Self::DeleteProduct,
    ];

    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthCheck => "HealthCheck",
            Self::GetProduct => "GetProduct",
            Self::ListProducts => "ListProducts",
            Self::SaveProduct => "SaveProduct",
            Self::ModifyProduct => "ModifyProduct",
            Self::DeleteProduct => "DeleteProduct",
        }
    }

    /// Whether the operation writes to the store.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::SaveProduct | Self::ModifyProduct | Self::DeleteProduct
        )
    }
}

impl fmt::Display for ProductOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
