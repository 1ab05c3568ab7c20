//! Full-table scan accumulation.

use tracing::debug;

use inventory_model::{InventoryError, Product};

use crate::gateway::StoreGateway;

impl StoreGateway {
    /// Scan the whole table, following continuation tokens until none is returned.
    ///
    /// Pages are fetched strictly one after another and records keep store
    /// order within and across pages.
    pub async fn scan_all(&self) -> Result<Vec<Product>, InventoryError> {
        let mut products = Vec::new();
        let mut token = None;
        let mut pages = 0_usize;

        loop {
            let page = self.scan_page(token.as_ref()).await?;
            pages += 1;
            products.extend(page.items);

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(pages, count = products.len(), "full table scan complete");
        Ok(products)
    }
}
