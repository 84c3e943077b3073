use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::DepartmentId;

pub type ProductId = i64;

/// A product record as stored by the backend.
///
/// Field names follow the backend's wire format (`codigo`, `descricao`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "departamentoId")]
    pub department_id: DepartmentId,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "status")]
    pub active: bool,
}

/// Payload for creating or updating a product. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "departamentoId")]
    pub department_id: DepartmentId,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "status")]
    pub active: bool,
}

/// Editable copy of a product's fields while the create/edit panel is open.
///
/// Optional fields are `None` until the operator fills them in. The rules
/// declared here are evaluated by [`ProductDraft::validated`].
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 3, message = "Code must have at least 3 characters"))]
    pub code: String,
    #[validate(length(min = 5, message = "Description must have at least 5 characters"))]
    pub description: String,
    #[validate(required(message = "A department must be selected"))]
    pub department_id: Option<DepartmentId>,
    #[validate(
        required(message = "Price is required"),
        custom(function = "crate::validation::validate_price")
    )]
    pub price: Option<Decimal>,
    pub active: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            description: String::new(),
            department_id: None,
            price: None,
            active: true,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            description: product.description.clone(),
            department_id: Some(product.department_id),
            price: Some(product.price),
            active: product.active,
        }
    }
}

impl Product {
    pub fn from_payload(id: ProductId, payload: ProductPayload) -> Self {
        Self {
            id,
            code: payload.code,
            description: payload.description,
            department_id: payload.department_id,
            price: payload.price,
            active: payload.active,
        }
    }
}
