//! Product request router.
//!
//! Routing is an exact match on the `(method, path)` pair. The pairs in
//! [`ROUTES`] are disjoint, so at most one operation can match; anything else
//! falls through to the not-found response.

use inventory_model::ProductOperation;

/// Health probe path.
pub const HEALTH_PATH: &str = "/health";
/// Single-product path.
pub const PRODUCT_PATH: &str = "/product";
/// Listing path.
pub const PRODUCTS_PATH: &str = "/products";

/// The routing table.
pub const ROUTES: [(&str, &str, ProductOperation); 6] = [
    ("GET", HEALTH_PATH, ProductOperation::HealthCheck),
    ("GET", PRODUCT_PATH, ProductOperation::GetProduct),
    ("GET", PRODUCTS_PATH, ProductOperation::ListProducts),
    ("POST", PRODUCT_PATH, ProductOperation::SaveProduct),
    ("PATCH", PRODUCT_PATH, ProductOperation::ModifyProduct),
    ("DELETE", PRODUCT_PATH, ProductOperation::DeleteProduct),
];

/// Resolve the operation for a method and path.
///
/// Returns `None` when the pair is not in the routing table.
#[must_use]
pub fn resolve_operation(method: &str, path: &str) -> Option<ProductOperation> {
    ROUTES
        .iter()
        .find(|(m, p, _)| *m == method && *p == path)
        .map(|(_, _, op)| *op)
}
