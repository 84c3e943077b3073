use std::sync::Arc;

use tracing::{debug, instrument};

use super::{encode_body, exchange, send_checked};
use crate::classifier::{ClassifiedError, ErrorClassifier};
use crate::domain::{Product, ProductId, ProductPayload};
use crate::transport::{ApiRequest, TransportClient};

const PRODUCTS_PATH: &str = "/produtos";

fn product_path(id: ProductId) -> String {
    format!("{PRODUCTS_PATH}/{id}")
}

/// Client for the product collection.
#[derive(Clone)]
pub struct ProductClient {
    transport: TransportClient,
    classifier: Arc<dyn ErrorClassifier>,
}

impl_basic_client!(ProductClient, Product, PRODUCTS_PATH, products);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ClassifiedError> {
        debug!("Sending request");
        exchange(&self.transport, self.classifier.as_ref(), ApiRequest::get(product_path(id))).await
    }

    /// Creates a product; the returned record carries the id assigned by the backend.
    #[instrument(skip(self, payload), fields(code = %payload.code))]
    pub async fn create_product(
        &self,
        payload: ProductPayload,
    ) -> Result<Product, ClassifiedError> {
        debug!("Sending request");
        let body = encode_body(self.classifier.as_ref(), &payload)?;
        let request = ApiRequest::post(PRODUCTS_PATH, body);
        exchange(&self.transport, self.classifier.as_ref(), request).await
    }

    #[instrument(skip(self, payload), fields(code = %payload.code))]
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, ClassifiedError> {
        debug!("Sending request");
        let body = encode_body(self.classifier.as_ref(), &Product::from_payload(id, payload))?;
        let request = ApiRequest::put(product_path(id), body);
        exchange(&self.transport, self.classifier.as_ref(), request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClassifiedError> {
        debug!("Sending request");
        let request = ApiRequest::delete(product_path(id));
        send_checked(&self.transport, self.classifier.as_ref(), request)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::classifier::ClassifiedError;
    use crate::domain::ProductPayload;
    use crate::mock_framework::{
        assert_no_request, create_mock_records, expect_request, reply_empty, reply_json,
        sample_product,
    };
    use crate::transport::{ApiResponse, Method};

    fn payload() -> ProductPayload {
        ProductPayload {
            code: "ABC123".to_string(),
            description: "Valid desc".to_string(),
            department_id: 1,
            price: Decimal::new(1050, 2),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_list_products_keeps_server_order() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.list_products().await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected GET request");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/produtos");
        assert_eq!(request.body, None);
        reply_json(responder, 200, &vec![sample_product(3), sample_product(1)]);

        let products = task.await.unwrap().expect("products should load");
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_product_wire_shape_is_decoded() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.get_product(7).await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected GET request");
        assert_eq!(request.path, "/produtos/7");
        reply_json(
            responder,
            200,
            &json!({
                "id": 7,
                "codigo": "ABC123",
                "descricao": "Valid desc",
                "departamentoId": 2,
                "preco": 10,
                "status": false
            }),
        );

        let product = task.await.unwrap().expect("product should load");
        assert_eq!(product.id, 7);
        assert_eq!(product.code, "ABC123");
        assert_eq!(product.department_id, 2);
        assert_eq!(product.price, Decimal::from(10));
        assert!(!product.active);
    }

    #[tokio::test]
    async fn test_create_sends_payload_without_id() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.create_product(payload()).await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected POST request");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/produtos");
        assert_eq!(
            request.body,
            Some(json!({
                "codigo": "ABC123",
                "descricao": "Valid desc",
                "departamentoId": 1,
                "preco": 10.5,
                "status": true
            }))
        );
        reply_json(responder, 201, &sample_product(7));

        let created = task.await.unwrap().expect("create should succeed");
        assert_eq!(created.id, 7);
        assert_no_request(&mut receiver);
    }

    #[tokio::test]
    async fn test_update_sends_full_product() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.update_product(7, payload()).await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected PUT request");
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/produtos/7");
        let body = request.body.expect("PUT carries a body");
        assert_eq!(body["id"], json!(7));
        assert_eq!(body["codigo"], json!("ABC123"));
        reply_json(responder, 200, &sample_product(7));

        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.delete_product(7).await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected DELETE request");
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/produtos/7");
        reply_empty(responder, 204);

        assert_eq!(task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_delete_of_missing_product_is_not_found() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.delete_product(7).await });

        let (_, responder) = expect_request(&mut receiver).await.expect("Expected DELETE request");
        reply_empty(responder, 404);

        assert_eq!(task.await.unwrap(), Err(ClassifiedError::NotFound));
    }

    #[tokio::test]
    async fn test_unmapped_status_keeps_code() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.list_products().await });

        let (_, responder) = expect_request(&mut receiver).await.expect("Expected GET request");
        reply_empty(responder, 503);

        match task.await.unwrap() {
            Err(ClassifiedError::Other { status, message }) => {
                assert_eq!(status, 503);
                assert!(message.contains("GET /produtos"), "unexpected message: {message}");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_classified_with_response_status() {
        let (records, mut receiver) = create_mock_records(10);

        let task = tokio::spawn(async move { records.list_products().await });

        let (_, responder) = expect_request(&mut receiver).await.expect("Expected GET request");
        responder
            .send(Ok(ApiResponse { status: 200, body: "<html>".to_string() }))
            .unwrap();

        match task.await.unwrap() {
            Err(ClassifiedError::Other { status, .. }) => assert_eq!(status, 200),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
