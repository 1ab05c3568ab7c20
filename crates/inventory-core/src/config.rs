//! Inventory service configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use inventory_http::InventoryHttpConfig;

use crate::retry::RetryPolicy;

/// Default table name.
pub const DEFAULT_TABLE_NAME: &str = "products-inventory";

/// Which store backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Amazon DynamoDB (or a compatible endpoint).
    DynamoDB,
    /// Process-local in-memory table.
    Memory,
}

/// Configuration errors detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set to a value the service does not understand.
    #[error("invalid value {value:?} for {key}, expected {expected}")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(Self::DynamoDB),
            "memory" | "in-memory" | "mem" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "PRODUCT_STORE",
                value: raw.to_owned(),
                expected: "`dynamodb` or `memory`",
            }),
        }
    }
}

impl StoreBackend {
    /// Lowercase backend name, as accepted by `PRODUCT_STORE`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DynamoDB => "dynamodb",
            Self::Memory => "memory",
        }
    }
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Table holding the products.
    pub table_name: String,
    /// Region used when the environment provides none.
    pub default_region: String,
    /// Endpoint override, e.g. a local DynamoDB emulator.
    pub dynamodb_endpoint_url: Option<String>,
    /// Selected store backend.
    pub store_backend: StoreBackend,
    /// Page size of the in-memory backend's scans.
    pub memory_page_size: usize,
    /// Total attempts per store call, including the first.
    pub store_max_attempts: u32,
    /// First retry backoff.
    pub store_retry_base: Duration,
    /// Upper bound on a single retry backoff.
    pub store_retry_max: Duration,
    /// Timeout of a single store request.
    pub store_timeout: Duration,
    /// Overall deadline of one invocation.
    pub invocation_timeout: Duration,
    /// Largest request body the local HTTP server accepts.
    pub max_body_bytes: usize,
    /// Bind address of the local HTTP server.
    pub gateway_listen: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Set when running inside the Lambda execution environment.
    pub lambda_runtime_api: Option<String>,
}

impl InventoryConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Unparsable numbers fall back to their defaults; an unknown store
    /// backend is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let millis =
            |key: &str, default: Duration| parsed(key).map_or(default, Duration::from_millis);

        let store_backend = match lookup("PRODUCT_STORE").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        Ok(Self {
            table_name: lookup("PRODUCTS_TABLE")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.table_name),
            default_region: lookup("DEFAULT_REGION")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_region),
            dynamodb_endpoint_url: lookup("DYNAMODB_ENDPOINT_URL").filter(|v| !v.is_empty()),
            store_backend,
            memory_page_size: parsed("MEMORY_PAGE_SIZE")
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.memory_page_size),
            store_max_attempts: parsed("STORE_MAX_ATTEMPTS")
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.store_max_attempts),
            store_retry_base: millis("STORE_RETRY_BASE_MS", defaults.store_retry_base),
            store_retry_max: millis("STORE_RETRY_MAX_MS", defaults.store_retry_max),
            store_timeout: millis("STORE_TIMEOUT_MS", defaults.store_timeout),
            invocation_timeout: millis("INVOCATION_TIMEOUT_MS", defaults.invocation_timeout),
            max_body_bytes: parsed("MAX_BODY_BYTES")
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.max_body_bytes),
            gateway_listen: lookup("GATEWAY_LISTEN").unwrap_or(defaults.gateway_listen),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            lambda_runtime_api: lookup("AWS_LAMBDA_RUNTIME_API").filter(|v| !v.is_empty()),
        })
    }

    /// Whether the process runs under the Lambda runtime API.
    #[must_use]
    pub fn is_lambda(&self) -> bool {
        self.lambda_runtime_api.is_some()
    }

    /// Retry policy for store calls.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.store_max_attempts,
            base_delay: self.store_retry_base,
            max_delay: self.store_retry_max,
        }
    }

    /// Dispatch configuration for the HTTP layer.
    #[must_use]
    pub fn http_config(&self) -> InventoryHttpConfig {
        InventoryHttpConfig {
            invocation_timeout: self.invocation_timeout,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_owned(),
            default_region: "us-east-1".to_owned(),
            dynamodb_endpoint_url: None,
            store_backend: StoreBackend::DynamoDB,
            memory_page_size: crate::memory::DEFAULT_PAGE_SIZE,
            store_max_attempts: 3,
            store_retry_base: Duration::from_millis(50),
            store_retry_max: Duration::from_millis(1000),
            store_timeout: Duration::from_millis(3000),
            invocation_timeout: inventory_http::dispatch::DEFAULT_INVOCATION_TIMEOUT,
            max_body_bytes: inventory_http::dispatch::DEFAULT_MAX_BODY_BYTES,
            gateway_listen: "0.0.0.0:3000".to_owned(),
            log_level: "info".to_owned(),
            lambda_runtime_api: None,
        }
    }
}
