//! Product CRUD integration tests against a running inventory server.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        cleanup_product, create_product, endpoint_url, get_product, http_client, status_and_json,
        test_product_id,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_fetch_product() {
        let client = http_client();
        let id = test_product_id("fetch");

        let product = json!({"productId": id, "name": "Widget", "price": 9.99});
        let resp = client
            .post(format!("{}/product", endpoint_url()))
            .json(&product)
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 200);
        assert_eq!(
            body.unwrap(),
            json!({"Operation": "SAVE", "Message": "SUCCESS", "Item": product})
        );

        let (status, body) = get_product(&client, &id).await;
        assert_eq!(status, 200);
        assert_eq!(body.unwrap(), product);

        cleanup_product(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_overwrite_on_repeated_create() {
        let client = http_client();
        let id = test_product_id("idem");

        create_product(&client, &json!({"productId": id, "name": "Widget"})).await;
        create_product(&client, &json!({"productId": id, "name": "Gadget"})).await;

        let (_, body) = get_product(&client, &id).await;
        assert_eq!(body.unwrap(), json!({"productId": id, "name": "Gadget"}));

        cleanup_product(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_single_field() {
        let client = http_client();
        let id = test_product_id("update");
        create_product(&client, &json!({"productId": id, "name": "Widget", "price": 9.99})).await;

        let resp = client
            .patch(format!("{}/product", endpoint_url()))
            .json(&json!({"product_id": id, "updateKey": "price", "updateValue": 12.5}))
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 200);
        assert_eq!(
            body.unwrap(),
            json!({"Operation": "UPDATE", "Message": "SUCCESS", "Item": {"price": 12.5}})
        );

        let (_, body) = get_product(&client, &id).await;
        let body = body.unwrap();
        assert_eq!(body["price"], 12.5);
        assert_eq!(body["name"], "Widget");

        cleanup_product(&client, &id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_product() {
        let client = http_client();
        let id = test_product_id("delete");
        create_product(&client, &json!({"productId": id, "name": "Widget"})).await;

        let resp = client
            .delete(format!("{}/product", endpoint_url()))
            .json(&json!({"product_id": id}))
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 200);
        assert_eq!(body.unwrap()["Operation"], "DELETE");

        let (status, body) = get_product(&client, &id).await;
        assert_eq!(status, 200);
        assert!(body.is_none());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_products() {
        let client = http_client();
        let ids: Vec<String> = (0..3).map(|_| test_product_id("list")).collect();
        for id in &ids {
            create_product(&client, &json!({"productId": id})).await;
        }

        let resp = client
            .get(format!("{}/products", endpoint_url()))
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 200);
        let body = body.unwrap();
        let listed: Vec<&str> = body["products"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["productId"].as_str())
            .collect();
        for id in &ids {
            assert!(listed.contains(&id.as_str()), "{id} missing from listing");
        }

        for id in &ids {
            cleanup_product(&client, id).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_product_on_update_and_delete() {
        let client = http_client();
        let id = test_product_id("ghost");

        let resp = client
            .patch(format!("{}/product", endpoint_url()))
            .json(&json!({"product_id": id, "updateKey": "price", "updateValue": 1}))
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 404);
        assert_eq!(body.unwrap()["Error"], "ProductNotFound");

        let resp = client
            .delete(format!("{}/product", endpoint_url()))
            .json(&json!({"product_id": id}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404);

        // Neither call may have created the record.
        let (_, body) = get_product(&client, &id).await;
        assert!(body.is_none());
    }
}
