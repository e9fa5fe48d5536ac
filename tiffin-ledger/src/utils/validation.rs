//! Input validation helpers
//!
//! Shared by the offering, ad-hoc and account services. Each helper returns
//! an `InvalidInput` kind error and never touches storage.

use shared::{AppError, AppResult, BusinessDate, ErrorCode, MonthKey};

/// Titles and display names
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Upper bound for any single price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Validate that a required string is non-empty and within the length limit
/// and return it trimmed.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if trimmed.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            trimmed.len()
        ))
        .with_detail("field", field));
    }
    Ok(trimmed.to_string())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: Option<&str>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Price must be finite, non-negative and at most [`MAX_PRICE`].
///
/// `code` selects the domain-specific error code for the caller.
pub fn validate_price(price: f64, code: ErrorCode) -> AppResult<f64> {
    if !price.is_finite() {
        return Err(AppError::with_message(code, format!("price must be a finite number, got {price}")));
    }
    if price < 0.0 {
        return Err(AppError::with_message(code, format!("price must be non-negative, got {price}")));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            code,
            format!("price exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    Ok(price)
}

/// Strict `YYYY-MM-DD`
pub fn parse_date(value: &str) -> AppResult<BusinessDate> {
    Ok(BusinessDate::parse(value.trim())?)
}

/// Strict `YYYY-MM`; `None` and blank input mean "no filter"
pub fn parse_month(value: Option<&str>) -> AppResult<Option<MonthKey>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(MonthKey::parse(s)?)),
    }
}
