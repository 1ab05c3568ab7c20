//! In-memory product store.
//!
//! Records live in a [`DashMap`] keyed by `productId`. Scans walk the keys in
//! ascending order and are split into pages of a fixed size, with the last
//! key of a truncated page serving as the continuation token. Missing-key
//! semantics match the DynamoDB backend's conditional writes.

use dashmap::DashMap;
use tracing::debug;

use inventory_model::{FieldValue, Product};

use crate::store::{ContinuationToken, ProductStore, ScanPage, StoreError};

/// Default number of records per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Concurrent in-memory product table.
#[derive(Debug)]
pub struct InMemoryProductStore {
    items: DashMap<String, Product>,
    page_size: usize,
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryProductStore {
    /// Create an empty store returning at most `page_size` records per scan page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            items: DashMap::new(),
            page_size: page_size.max(1),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.items.get(product_id).map(|e| e.value().clone()))
    }

    async fn scan_page(&self, token: Option<&ContinuationToken>) -> Result<ScanPage, StoreError> {
        let keys = self.sorted_keys();

        // Skip everything up to and including the token key.
        let start = match token {
            Some(token) => {
                let after = token.product_id().ok_or_else(|| {
                    StoreError::InvalidItem("continuation token has no string key".to_owned())
                })?;
                keys.partition_point(|k| k.as_str() <= after)
            }
            None => 0,
        };

        let selected = &keys[start..keys.len().min(start + self.page_size)];
        let items: Vec<Product> = selected
            .iter()
            .filter_map(|k| self.items.get(k).map(|e| e.value().clone()))
            .collect();

        let has_more = start + self.page_size < keys.len();
        let next_token = if has_more {
            selected.last().map(|k| ContinuationToken::after(k))
        } else {
            None
        };

        debug!(returned = items.len(), has_more, "in-memory scan page");
        Ok(ScanPage { items, next_token })
    }

    async fn put(&self, product: &Product) -> Result<(), StoreError> {
        let product_id = product
            .id()
            .ok_or_else(|| StoreError::InvalidItem("product has no string productId".to_owned()))?;
        self.items.insert(product_id.to_owned(), product.clone());
        Ok(())
    }

    async fn update_field(
        &self,
        product_id: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Product, StoreError> {
        let mut entry = self
            .items
            .get_mut(product_id)
            .ok_or_else(|| StoreError::NotFound {
                product_id: product_id.to_owned(),
            })?;
        entry.insert(field, value.clone());

        let mut changed = Product::default();
        changed.insert(field, value.clone());
        Ok(changed)
    }

    async fn delete(&self, product_id: &str) -> Result<Product, StoreError> {
        self.items
            .remove(product_id)
            .map(|(_, product)| product)
            .ok_or_else(|| StoreError::NotFound {
                product_id: product_id.to_owned(),
            })
    }
}
