//! Integration tests for the products inventory server.
//!
//! The HTTP tests require a running server in local mode at `localhost:3000`
//! (for example `PRODUCT_STORE=memory inventory-server`). The DynamoDB store
//! tests require a DynamoDB-compatible endpoint at `localhost:4566`
//! (override with `DYNAMODB_ENDPOINT_URL`). All of them are marked
//! `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p inventory-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use serde_json::Value;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("INVENTORY_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Create an HTTP client for the server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique product key for a test.
#[must_use]
pub fn test_product_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Status code and decoded body of a response. An empty body decodes to `None`.
pub async fn status_and_json(resp: reqwest::Response) -> (u16, Option<Value>) {
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .unwrap_or_else(|e| panic!("failed to read response body: {e}"));
    if text.is_empty() {
        (status, None)
    } else {
        let json = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("response body is not JSON ({e}): {text}"));
        (status, Some(json))
    }
}

/// Create a product and assert success.
pub async fn create_product(client: &reqwest::Client, product: &Value) {
    let resp = client
        .post(format!("{}/product", endpoint_url()))
        .json(product)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create product {product}: {e}"));
    assert_eq!(resp.status().as_u16(), 200, "create {product}");
}

/// Fetch one product.
pub async fn get_product(client: &reqwest::Client, product_id: &str) -> (u16, Option<Value>) {
    let resp = client
        .get(format!("{}/product?product_id={product_id}", endpoint_url()))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to fetch product {product_id}: {e}"));
    status_and_json(resp).await
}

/// Best-effort delete used for cleanup.
pub async fn cleanup_product(client: &reqwest::Client, product_id: &str) {
    let _ = client
        .delete(format!("{}/product", endpoint_url()))
        .json(&serde_json::json!({ "product_id": product_id }))
        .send()
        .await;
}

/// Create a DynamoDB client pointing at the local endpoint.
#[must_use]
pub fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    init_tracing();

    let endpoint = std::env::var("DYNAMODB_ENDPOINT_URL")
        .unwrap_or_else(|_| "http://localhost:4566".to_owned());
    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_dynamodb::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint)
        .build();

    aws_sdk_dynamodb::Client::from_conf(config)
}

/// Create a uniquely named table keyed by `productId` and return its name.
pub async fn create_products_table(client: &aws_sdk_dynamodb::Client, prefix: &str) -> String {
    let table_name = test_product_id(prefix);
    client
        .create_table()
        .table_name(&table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("productId")
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("productId")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create table {table_name}: {e}"));
    table_name
}

/// Best-effort table removal used for cleanup.
pub async fn cleanup_table(client: &aws_sdk_dynamodb::Client, table_name: &str) {
    let _ = client.delete_table().table_name(table_name).send().await;
}

mod test_dynamodb_store;
mod test_products;
mod test_routing;
