//! HTTP layer for the products inventory service.
//!
//! - **Router**: maps an exact `(method, path)` pair to a [`ProductOperation`]
//! - **Response helpers**: build proxy envelopes with a JSON content type
//! - **Handler trait**: the boundary between routing and business logic
//! - **Dispatch**: runs one event through router and handler under a deadline
//! - **Service**: hyper `Service` that adapts plain HTTP to proxy envelopes
//!
//! [`ProductOperation`]: inventory_model::ProductOperation
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::InventoryResponseBody;
pub use dispatch::{InventoryHttpConfig, ProductHandler, dispatch_event};
pub use service::InventoryHttpService;
