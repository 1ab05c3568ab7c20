//! Inventory error types.
//!
//! Every failure a request can hit is reported as an [`InventoryError`]. The
//! error code determines the HTTP status, and the JSON error body carries the
//! short code name plus a human-readable message.

use std::fmt;

/// Well-known inventory error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum InventoryErrorCode {
    /// Missing or invalid request parameter.
    #[default]
    ValidationException,
    /// Request body is not valid JSON.
    SerializationException,
    /// Request body exceeds the accepted payload size.
    RequestTooLarge,
    /// Update or delete addressed a product that does not exist.
    ProductNotFound,
    /// The store kept failing transiently after all retries.
    StoreUnavailable,
    /// The store rejected the operation.
    StoreError,
    /// The invocation exceeded its deadline.
    Timeout,
    /// Internal server error.
    InternalServerError,
}

impl InventoryErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::RequestTooLarge => "RequestTooLarge",
            Self::ProductNotFound => "ProductNotFound",
            Self::StoreUnavailable => "StoreUnavailable",
            Self::StoreError => "StoreError",
            Self::Timeout => "Timeout",
            Self::InternalServerError => "InternalServerError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::ValidationException | Self::SerializationException => {
                http::StatusCode::BAD_REQUEST
            }
            Self::RequestTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::ProductNotFound => http::StatusCode::NOT_FOUND,
            Self::StoreUnavailable => http::StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => http::StatusCode::GATEWAY_TIMEOUT,
            Self::StoreError | Self::InternalServerError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for InventoryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inventory error response.
#[derive(Debug)]
pub struct InventoryError {
    /// The error code.
    pub code: InventoryErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InventoryError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl InventoryError {
    /// Create a new `InventoryError` from an error code.
    #[must_use]
    pub fn new(code: InventoryErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `InventoryError` with a custom message.
    #[must_use]
    pub fn with_message(code: InventoryErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Missing or invalid input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::ValidationException, message)
    }

    /// Body could not be parsed.
    #[must_use]
    pub fn serialization_exception(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::SerializationException, message)
    }

    /// Body larger than `limit` bytes.
    #[must_use]
    pub fn request_too_large(limit: usize) -> Self {
        Self::with_message(
            InventoryErrorCode::RequestTooLarge,
            format!("Request body exceeds {limit} bytes"),
        )
    }

    /// No product with the given key.
    #[must_use]
    pub fn product_not_found(product_id: &str) -> Self {
        Self::with_message(
            InventoryErrorCode::ProductNotFound,
            format!("Product not found: {product_id}"),
        )
    }

    /// Store kept failing transiently.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::StoreUnavailable, message)
    }

    /// Store rejected the request.
    #[must_use]
    pub fn store_error(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::StoreError, message)
    }

    /// Invocation deadline exceeded.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::Timeout, message)
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(InventoryErrorCode::InternalServerError, message)
    }
}

/// Create an `InventoryError` from an error code.
///
/// # Examples
///
/// ```
/// use inventory_model::inventory_error;
/// use inventory_model::error::InventoryErrorCode;
///
/// let err = inventory_error!(ValidationException);
/// assert_eq!(err.code, InventoryErrorCode::ValidationException);
///
/// let err = inventory_error!(ProductNotFound, "Product not found: p1");
/// assert_eq!(err.message, "Product not found: p1");
/// assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
/// ```
#[macro_export]
macro_rules! inventory_error {
    ($code:ident) => {
        $crate::error::InventoryError::new($crate::error::InventoryErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::InventoryError::with_message(
            $crate::error::InventoryErrorCode::$code,
            $msg,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_codes_to_status() {
        assert_eq!(
            InventoryError::validation("x").status_code,
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InventoryError::serialization_exception("x").status_code,
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InventoryError::request_too_large(10).status_code,
            http::StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            InventoryError::product_not_found("p1").status_code,
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            InventoryError::store_unavailable("x").status_code,
            http::StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            InventoryError::store_error("x").status_code,
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            InventoryError::timeout("x").status_code,
            http::StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_should_use_code_as_default_message() {
        let err = InventoryError::new(InventoryErrorCode::StoreError);
        assert_eq!(err.message, "StoreError");
        assert_eq!(err.to_string(), "InventoryError(StoreError): StoreError");
    }

    #[test]
    fn test_should_expose_source() {
        use std::error::Error as _;

        let io = std::io::Error::other("boom");
        let err = InventoryError::internal_error("wrapped").with_source(io);
        assert!(err.source().is_some());
    }
}
