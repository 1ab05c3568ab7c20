//! DynamoDB-backed product store.
//!
//! Each trait method issues exactly one SDK request. The SDK's own retry layer
//! is disabled so that the gateway's [`RetryPolicy`](crate::retry::RetryPolicy)
//! is the only place attempts are counted.

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::builders::DeleteItemFluentBuilder;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::operation::update_item::builders::UpdateItemFluentBuilder;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::debug;

use inventory_model::{FieldValue, KEY_ATTRIBUTE, Product};

use crate::config::InventoryConfig;
use crate::convert::{from_attribute_value, from_item, to_attribute_value, to_item};
use crate::store::{ContinuationToken, ProductStore, ScanPage, StoreError};

/// Error codes of requests rejected before being applied.
const THROTTLING_ERROR_CODES: &[&str] = &[
    "ProvisionedThroughputExceededException",
    "ThrottlingException",
    "RequestLimitExceeded",
    "LimitExceededException",
];

/// Error codes of server-side faults; the request may have been applied.
const SERVER_ERROR_CODES: &[&str] = &["InternalServerError", "ServiceUnavailable"];

const UPDATE_EXPRESSION: &str = "SET #field = :value";
const KEY_EXISTS_CONDITION: &str = "attribute_exists(#pk)";

const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";

/// Product store backed by a DynamoDB table.
#[derive(Clone)]
pub struct DynamoDBProductStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDBProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDBProductStore")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl DynamoDBProductStore {
    /// Build a client from the ambient AWS configuration plus overrides.
    ///
    /// The region comes from the standard provider chain, falling back to
    /// `default_region`.
    pub async fn connect(config: &InventoryConfig) -> Self {
        let region = RegionProviderChain::default_provider()
            .or_else(Region::new(config.default_region.clone()));
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.store_timeout)
                    .build(),
            );

        if let Some(endpoint) = &config.dynamodb_endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_client(Client::from_conf(builder.build()), config.table_name.clone())
    }

    /// Wrap a pre-built client.
    #[must_use]
    pub fn from_client(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(product_id: &str) -> (String, AttributeValue) {
        (KEY_ATTRIBUTE.to_owned(), AttributeValue::S(product_id.to_owned()))
    }

    fn scan_request(&self, token: Option<&ContinuationToken>) -> ScanFluentBuilder {
        self.client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(token.map(|t| to_item(t.key())))
    }

    /// The field name only ever travels as an attribute-name placeholder.
    fn update_request(
        &self,
        product_id: &str,
        field: &str,
        value: &FieldValue,
    ) -> UpdateItemFluentBuilder {
        let (name, key) = Self::key(product_id);
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(name, key)
            .update_expression(UPDATE_EXPRESSION)
            .condition_expression(KEY_EXISTS_CONDITION)
            .expression_attribute_names("#field", field)
            .expression_attribute_names("#pk", KEY_ATTRIBUTE)
            .expression_attribute_values(":value", to_attribute_value(value))
            .return_values(ReturnValue::UpdatedNew)
    }

    fn delete_request(&self, product_id: &str) -> DeleteItemFluentBuilder {
        let (name, key) = Self::key(product_id);
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(name, key)
            .condition_expression(KEY_EXISTS_CONDITION)
            .expression_attribute_names("#pk", KEY_ATTRIBUTE)
            .return_values(ReturnValue::AllOld)
    }
}

/// Turn a scan's `LastEvaluatedKey` into a continuation token. An empty key
/// counts as absent.
fn next_token(
    last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
) -> Result<Option<ContinuationToken>, StoreError> {
    match last_evaluated_key {
        Some(key) if !key.is_empty() => {
            let fields = key
                .iter()
                .map(|(k, v)| Ok((k.clone(), from_attribute_value(v)?)))
                .collect::<Result<_, StoreError>>()?;
            Ok(Some(ContinuationToken::new(fields)))
        }
        _ => Ok(None),
    }
}

/// Decode the attributes returned by a conditional write.
fn returned_attributes(
    attributes: Option<&HashMap<String, AttributeValue>>,
) -> Result<Product, StoreError> {
    attributes.map_or_else(|| Ok(Product::default()), from_item)
}

/// Map a conditional write failure, treating a failed key condition as a
/// missing product.
fn conditional_write_error<E, R>(
    operation: &'static str,
    product_id: &str,
    err: &SdkError<E, R>,
) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if is_conditional_check_failed(err) {
        StoreError::NotFound {
            product_id: product_id.to_owned(),
        }
    } else {
        classify(operation, err)
    }
}

#[async_trait::async_trait]
impl ProductStore for DynamoDBProductStore {
    async fn get(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        let (name, key) = Self::key(product_id);
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(name, key)
            .send()
            .await
            .map_err(|e| classify("GetItem", &e))?;

        output.item().map(from_item).transpose()
    }

    async fn scan_page(&self, token: Option<&ContinuationToken>) -> Result<ScanPage, StoreError> {
        let output = self
            .scan_request(token)
            .send()
            .await
            .map_err(|e| classify("Scan", &e))?;

        let items = output
            .items()
            .iter()
            .map(from_item)
            .collect::<Result<Vec<_>, _>>()?;

        let next_token = next_token(output.last_evaluated_key())?;

        debug!(
            table = %self.table_name,
            returned = items.len(),
            has_more = next_token.is_some(),
            "dynamodb scan page"
        );
        Ok(ScanPage { items, next_token })
    }

    async fn put(&self, product: &Product) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(product.fields())))
            .send()
            .await
            .map_err(|e| classify("PutItem", &e))?;
        Ok(())
    }

    async fn update_field(
        &self,
        product_id: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Product, StoreError> {
        let output = self
            .update_request(product_id, field, value)
            .send()
            .await
            .map_err(|e| conditional_write_error("UpdateItem", product_id, &e))?;
        returned_attributes(output.attributes())
    }

    async fn delete(&self, product_id: &str) -> Result<Product, StoreError> {
        let output = self
            .delete_request(product_id)
            .send()
            .await
            .map_err(|e| conditional_write_error("DeleteItem", product_id, &e))?;
        returned_attributes(output.attributes())
    }
}

/// Check if an SDK error is a conditional check failure.
fn is_conditional_check_failed<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::ServiceError(service_err) => {
            service_err.err().code() == Some(CONDITIONAL_CHECK_FAILED)
        }
        _ => false,
    }
}

/// Whether a service error code is worth retrying.
#[must_use]
pub fn is_transient_code(code: &str) -> bool {
    is_throttling_code(code) || SERVER_ERROR_CODES.contains(&code)
}

/// Whether a service error code guarantees the request was not applied.
#[must_use]
pub fn is_throttling_code(code: &str) -> bool {
    THROTTLING_ERROR_CODES.contains(&code)
}

/// Map an SDK error onto the store error taxonomy.
///
/// Throttling rejections are `Transient`. Timeouts, dispatch and response
/// failures and server faults are `Indeterminate`: the request may have been
/// applied.
fn classify<E, R>(operation: &'static str, err: &SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(err).to_string();
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Indeterminate { operation, message }
        }
        SdkError::ServiceError(service_err) => match service_err.err().code() {
            Some(code) if is_throttling_code(code) => StoreError::Transient { operation, message },
            Some(code) if is_transient_code(code) => {
                StoreError::Indeterminate { operation, message }
            }
            _ => StoreError::Permanent { operation, message },
        },
        _ => StoreError::Permanent { operation, message },
    }
}
