//! Field rules applied to a [`ProductDraft`] before anything is sent to the backend.

use rust_decimal::Decimal;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::{ProductDraft, ProductPayload};

/// Smallest accepted price, one cent.
pub fn min_price() -> Decimal {
    Decimal::new(1, 2)
}

/// A draft that failed one or more field rules.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid fields: {}", .fields.join(", "))]
pub struct InvalidDraft {
    /// Names of the failing fields, sorted.
    pub fields: Vec<String>,
}

pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let min = min_price();
    if *price >= min {
        Ok(())
    } else {
        let mut error = ValidationError::new("min_price");
        error.message = Some(format!("Price must be at least {min}").into());
        Err(error)
    }
}

impl ProductDraft {
    /// Runs every field rule and, when all pass, returns the payload to submit.
    pub fn validated(&self) -> Result<ProductPayload, InvalidDraft> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .into_keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            return Err(InvalidDraft { fields });
        }

        match (self.department_id, self.price) {
            (Some(department_id), Some(price)) => Ok(ProductPayload {
                code: self.code.clone(),
                description: self.description.clone(),
                department_id,
                price,
                active: self.active,
            }),
            (department_id, price) => {
                let mut fields = Vec::new();
                if department_id.is_none() {
                    fields.push("department_id".to_string());
                }
                if price.is_none() {
                    fields.push("price".to_string());
                }
                Err(InvalidDraft { fields })
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validated().is_ok()
    }
}
