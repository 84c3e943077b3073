use std::sync::Arc;

use crate::classifier::ErrorClassifier;
use crate::domain::Department;
use crate::transport::TransportClient;

/// Client for the read-only department collection.
#[derive(Clone)]
pub struct DepartmentClient {
    transport: TransportClient,
    classifier: Arc<dyn ErrorClassifier>,
}

impl_basic_client!(DepartmentClient, Department, "/departamentos", departments);
