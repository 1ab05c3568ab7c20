//! Routing and validation integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client, status_and_json};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_with_empty_body() {
        let client = http_client();
        let resp = client
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert!(resp.headers().contains_key("x-request-id"));
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 200);
        assert!(body.is_none());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_routes() {
        let client = http_client();
        let cases = [
            client.get(format!("{}/nope", endpoint_url())),
            client.put(format!("{}/product", endpoint_url())),
            client.post(format!("{}/products", endpoint_url())),
            client.get(format!("{}/product/", endpoint_url())),
        ];
        for request in cases {
            let (status, body) = status_and_json(request.send().await.unwrap()).await;
            assert_eq!(status, 404);
            assert_eq!(body.unwrap(), "404 not-found");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_product_id() {
        let client = http_client();
        let resp = client
            .get(format!("{}/product", endpoint_url()))
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 400);
        assert_eq!(body.unwrap()["Error"], "ValidationException");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_json() {
        let client = http_client();
        let resp = client
            .post(format!("{}/product", endpoint_url()))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        let (status, body) = status_and_json(resp).await;
        assert_eq!(status, 400);
        assert_eq!(body.unwrap()["Error"], "SerializationException");
    }
}
