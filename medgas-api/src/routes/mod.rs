/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login, logout and the current session
/// - `cylinders`, `gas_types`, `inventory`, `supplies`: stock tracking
/// - `invoices`: Billing status
/// - `reports`: Read-only aggregates for administrators
/// - `debug`: Diagnostics, mounted only when enabled

pub mod auth;
pub mod cylinders;
pub mod debug;
pub mod gas_types;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod supplies;

/// Strips surrounding whitespace in place, so length checks see what gets stored
pub(crate) fn trim_field(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Accepts only strictly positive row ids
pub(crate) fn row_id(id: i32) -> Result<i32, crate::error::ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(crate::error::ApiError::BadRequest("Invalid id".to_string()))
    }
}
