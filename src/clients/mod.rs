//! Clients for the product and department collections of the REST API.
//!
//! Every failure leaves this module as a [`ClassifiedError`]; callers never see
//! raw status codes or transport errors.

#[macro_use]
mod macros;
mod department_client;
mod product_client;

pub use department_client::DepartmentClient;
pub use product_client::ProductClient;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::classifier::{ClassifiedError, ErrorClassifier, TransportFailure};
use crate::domain::{Department, Product, ProductId, ProductPayload};
use crate::transport::{ApiRequest, ApiResponse, TransportClient};

/// Sends `request` and fails unless the server answered with a 2xx status.
pub(crate) async fn send_checked(
    transport: &TransportClient,
    classifier: &dyn ErrorClassifier,
    request: ApiRequest,
) -> Result<ApiResponse, ClassifiedError> {
    let method = request.method;
    let path = request.path.clone();
    let response = transport
        .send(request)
        .await
        .map_err(|failure| classifier.classify(&failure))?;

    if response.is_success() {
        return Ok(response);
    }

    let mut message = format!("Http failure response for {method} {path}: {}", response.status);
    let detail = response.body.trim();
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(detail);
    }
    Err(classifier.classify(&TransportFailure::Status {
        status: response.status,
        message,
    }))
}

/// Sends `request` and decodes the JSON body of a successful response.
pub(crate) async fn exchange<T: DeserializeOwned>(
    transport: &TransportClient,
    classifier: &dyn ErrorClassifier,
    request: ApiRequest,
) -> Result<T, ClassifiedError> {
    let response = send_checked(transport, classifier, request).await?;
    serde_json::from_str(&response.body).map_err(|e| {
        classifier.classify(&TransportFailure::Status {
            status: response.status,
            message: format!("Http failure during parsing: {e}"),
        })
    })
}

/// Encodes a request body. A body that cannot be encoded is reported to the
/// classifier as a rejected request (400) without reaching the transport.
pub(crate) fn encode_body<T: Serialize>(
    classifier: &dyn ErrorClassifier,
    value: &T,
) -> Result<serde_json::Value, ClassifiedError> {
    serde_json::to_value(value).map_err(|e| {
        classifier.classify(&TransportFailure::Status {
            status: 400,
            message: format!("Request body could not be encoded: {e}"),
        })
    })
}

/// The record operations the workflow depends on, over both collections.
#[derive(Clone)]
pub struct RecordClient {
    products: ProductClient,
    departments: DepartmentClient,
}

impl RecordClient {
    pub fn new(transport: TransportClient, classifier: Arc<dyn ErrorClassifier>) -> Self {
        Self {
            products: ProductClient::new(transport.clone(), Arc::clone(&classifier)),
            departments: DepartmentClient::new(transport, classifier),
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClassifiedError> {
        self.products.list_products().await
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, ClassifiedError> {
        self.departments.list_departments().await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ClassifiedError> {
        self.products.get_product(id).await
    }

    pub async fn create_product(
        &self,
        payload: ProductPayload,
    ) -> Result<Product, ClassifiedError> {
        self.products.create_product(payload).await
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, ClassifiedError> {
        self.products.update_product(id, payload).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClassifiedError> {
        self.products.delete_product(id).await
    }
}
