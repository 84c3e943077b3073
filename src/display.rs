//! Formatting helpers for showing products to the operator.

use rust_decimal::Decimal;

use crate::domain::{Department, DepartmentId};

pub const UNKNOWN_DEPARTMENT: &str = "N/A";

pub fn department_name(departments: &[Department], id: DepartmentId) -> &str {
    departments
        .iter()
        .find(|department| department.id == id)
        .map(|department| department.name.as_str())
        .unwrap_or(UNKNOWN_DEPARTMENT)
}

/// Formats a price as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp(2);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}

pub fn format_status(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}
