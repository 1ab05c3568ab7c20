//! DynamoDB store tests against a DynamoDB-compatible endpoint.

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::AttributeValue;
    use inventory_core::dynamodb::DynamoDBProductStore;
    use inventory_core::{ContinuationToken, ProductStore, StoreError};
    use inventory_model::{FieldValue, Product};

    use crate::{cleanup_table, create_products_table, dynamodb_client, test_product_id};

    fn product(id: &str, name: &str) -> Product {
        [
            ("productId".to_owned(), FieldValue::from(id)),
            ("name".to_owned(), FieldValue::from(name)),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB endpoint"]
    async fn test_should_store_update_key_as_literal_attribute_name() {
        let client = dynamodb_client();
        let table = create_products_table(&client, "literal").await;
        let store = DynamoDBProductStore::from_client(client.clone(), table.clone());
        let id = test_product_id("p");
        store.put(&product(&id, "Widget")).await.unwrap();

        let changed = store
            .update_field(&id, "a.b", &FieldValue::from(1_i64))
            .await
            .unwrap();
        assert_eq!(changed.get("a.b"), Some(&FieldValue::from(1_i64)));
        store
            .update_field(&id, "name = :x", &FieldValue::from("evil"))
            .await
            .unwrap();

        let item = client
            .get_item()
            .table_name(&table)
            .key("productId", AttributeValue::S(id.clone()))
            .send()
            .await
            .unwrap()
            .item
            .unwrap();
        assert_eq!(item.get("a.b"), Some(&AttributeValue::N("1".to_owned())));
        assert_eq!(
            item.get("name = :x"),
            Some(&AttributeValue::S("evil".to_owned()))
        );
        assert_eq!(item.get("name"), Some(&AttributeValue::S("Widget".to_owned())));
        assert!(!item.contains_key("a"));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB endpoint"]
    async fn test_should_report_missing_key_without_creating_record() {
        let client = dynamodb_client();
        let table = create_products_table(&client, "missing").await;
        let store = DynamoDBProductStore::from_client(client.clone(), table.clone());

        let err = store
            .update_field("ghost", "price", &FieldValue::from(1_i64))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { product_id } if product_id == "ghost"));

        let err = store.delete("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        assert_eq!(store.get("ghost").await.unwrap(), None);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB endpoint"]
    async fn test_should_return_snapshot_on_delete() {
        let client = dynamodb_client();
        let table = create_products_table(&client, "delete").await;
        let store = DynamoDBProductStore::from_client(client.clone(), table.clone());
        let id = test_product_id("p");
        store.put(&product(&id, "Widget")).await.unwrap();

        let deleted = store.delete(&id).await.unwrap();
        assert_eq!(deleted, product(&id, "Widget"));
        assert_eq!(store.get(&id).await.unwrap(), None);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB endpoint"]
    async fn test_should_resume_scan_after_continuation_token() {
        let client = dynamodb_client();
        let table = create_products_table(&client, "scan").await;
        let store = DynamoDBProductStore::from_client(client.clone(), table.clone());
        for i in 0..3 {
            store
                .put(&product(&test_product_id("p"), &format!("item-{i}")))
                .await
                .unwrap();
        }

        let first = store.scan_page(None).await.unwrap();
        assert_eq!(first.items.len(), 3);
        assert!(first.next_token.is_none());

        let after_first = ContinuationToken::after(first.items[0].id().unwrap());
        let rest = store.scan_page(Some(&after_first)).await.unwrap();
        assert_eq!(rest.items, first.items[1..].to_vec());

        cleanup_table(&client, &table).await;
    }
}
