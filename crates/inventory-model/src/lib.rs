//! Model types for the products inventory service.
//!
//! This crate holds everything that crosses a crate boundary: the schema-less
//! [`Product`] record and its [`FieldValue`] tree, the API Gateway proxy
//! envelopes, the routed [`ProductOperation`] set, validated operation inputs,
//! success outputs, and the [`InventoryError`] type every layer reports through.
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod input;
pub mod operations;
pub mod output;
pub mod value;

pub use error::{InventoryError, InventoryErrorCode};
pub use event::{ProxyRequest, ProxyResponse};
pub use operations::ProductOperation;
pub use value::{FieldValue, Fields, KEY_ATTRIBUTE, Product};
