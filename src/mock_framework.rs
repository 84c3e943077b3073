//! # Mock Framework
//!
//! Utilities for testing clients and the workflow without a real backend.
//!
//! Use [`create_mock_transport`] (or [`create_mock_records`]) to get a client and a receiver.
//! Then use [`expect_request`] to take the next request and one of the `reply_*` helpers
//! to answer it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::classifier::{StatusClassifier, TransportFailure};
use crate::clients::RecordClient;
use crate::domain::{Product, ProductId};
use crate::transport::{ApiRequest, ApiResponse, Response, TransportClient, TransportRequest};

/// Creates a transport client whose requests land on the returned receiver.
///
/// # Testing Strategy
/// The test plays the backend: it reads each request from `receiver`, asserts on it,
/// and answers through the oneshot responder. Success, HTTP errors and connection
/// failures can all be simulated deterministically.
pub fn create_mock_transport(
    buffer_size: usize,
) -> (TransportClient, mpsc::Receiver<TransportRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (TransportClient::new(sender), receiver)
}

/// A [`RecordClient`] backed by a mock transport and the standard classifier.
pub fn create_mock_records(buffer_size: usize) -> (RecordClient, mpsc::Receiver<TransportRequest>) {
    let (transport, receiver) = create_mock_transport(buffer_size);
    (RecordClient::new(transport, Arc::new(StatusClassifier)), receiver)
}

/// Helper to take the next request sent through the transport
pub async fn expect_request(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Response)> {
    receiver
        .recv()
        .await
        .map(|TransportRequest { request, respond_to }| (request, respond_to))
}

/// Asserts that nothing has been sent since the last [`expect_request`].
pub fn assert_no_request(receiver: &mut mpsc::Receiver<TransportRequest>) {
    if let Ok(TransportRequest { request, .. }) = receiver.try_recv() {
        panic!("Unexpected request: {} {}", request.method, request.path);
    }
}

pub fn reply_json<T: Serialize>(respond_to: Response, status: u16, body: &T) {
    let body = serde_json::to_string(body).expect("test body should serialize");
    respond_to.send(Ok(ApiResponse { status, body })).expect("requester should be waiting");
}

pub fn reply_empty(respond_to: Response, status: u16) {
    respond_to
        .send(Ok(ApiResponse { status, body: String::new() }))
        .expect("requester should be waiting");
}

pub fn reply_no_response(respond_to: Response) {
    respond_to
        .send(Err(TransportFailure::NoResponse("connection refused".to_string())))
        .expect("requester should be waiting");
}

pub fn sample_product(id: ProductId) -> Product {
    Product {
        id,
        code: format!("P{id:03}"),
        description: format!("Sample product {id}"),
        department_id: 1,
        price: Decimal::new(1050, 2),
        active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;

    #[tokio::test]
    async fn test_mock_transport() {
        let (client, mut receiver) = create_mock_transport(10);

        let list_task =
            tokio::spawn(async move { client.send(ApiRequest::get("/produtos")).await });

        let (request, responder) = expect_request(&mut receiver)

            .await

            .expect("Expected GET request");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/produtos");
        reply_json(responder, 200, &vec![sample_product(1)]);

        let response = list_task.await.unwrap().expect("transport should answer");
        assert_eq!(response.status, 200);
        let products: Vec<Product> = serde_json::from_str(&response.body).unwrap();
        assert_eq!(products, vec![sample_product(1)]);
        assert_no_request(&mut receiver);
    }
}
