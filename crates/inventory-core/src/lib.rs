//! Products inventory business logic.
//!
//! - **Store**: the [`store::ProductStore`] trait with DynamoDB and in-memory backends
//! - **Gateway**: retrying wrapper that turns store failures into typed errors
//! - **Provider**: per-operation logic on validated inputs
//! - **Handler**: bridges the HTTP dispatch layer to the provider
#![allow(missing_docs, clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod convert;
pub mod dynamodb;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod memory;
pub mod pagination;
pub mod provider;
pub mod retry;
pub mod store;

pub use config::{ConfigError, InventoryConfig, StoreBackend};
pub use gateway::StoreGateway;
pub use handler::InventoryHandler;
pub use provider::InventoryProvider;
pub use store::{ContinuationToken, ProductStore, ScanPage, StoreError};
