//! Conversion of store errors into inventory errors.

use inventory_model::InventoryError;

use crate::store::StoreError;

/// Convert a store error into the inventory error reported to callers.
///
/// The store error is kept as the source.
#[must_use]
pub fn store_error_to_inventory(e: StoreError) -> InventoryError {
    let err = match &e {
        StoreError::NotFound { product_id } => InventoryError::product_not_found(product_id),
        StoreError::Transient { .. } | StoreError::Indeterminate { .. } => {
            InventoryError::store_unavailable(e.to_string())
        }
        StoreError::Permanent { .. } | StoreError::InvalidItem(_) => {
            InventoryError::store_error(e.to_string())
        }
    };
    err.with_source(e)
}

#[cfg(test)]
mod tests {
    use inventory_model::InventoryErrorCode;

    use super::*;

    #[test]
    fn test_should_map_not_found_to_404() {
        let err = store_error_to_inventory(StoreError::NotFound {
            product_id: "p9".to_owned(),
        });
        assert_eq!(err.code, InventoryErrorCode::ProductNotFound);
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Product not found: p9");
    }

    #[test]
    fn test_should_map_exhausted_transient_to_503() {
        let err = store_error_to_inventory(StoreError::Transient {
            operation: "Scan",
            message: "throttled".to_owned(),
        });
        assert_eq!(err.code, InventoryErrorCode::StoreUnavailable);
        assert_eq!(err.status_code, http::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.message.contains("throttled"));
    }

    #[test]
    fn test_should_map_unknown_outcome_to_503() {
        let err = store_error_to_inventory(StoreError::Indeterminate {
            operation: "DeleteItem",
            message: "operation timeout".to_owned(),
        });
        assert_eq!(err.code, InventoryErrorCode::StoreUnavailable);
        assert!(err.message.contains("outcome unknown"));
    }

    #[test]
    fn test_should_map_permanent_and_invalid_item_to_500() {
        for e in [
            StoreError::Permanent {
                operation: "PutItem",
                message: "no such table".to_owned(),
            },
            StoreError::InvalidItem("bad number".to_owned()),
        ] {
            let err = store_error_to_inventory(e);
            assert_eq!(err.code, InventoryErrorCode::StoreError);
            assert_eq!(err.status_code, http::StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
