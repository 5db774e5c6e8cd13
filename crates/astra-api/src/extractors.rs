//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers that map
//! extractor rejections to [`AppError`] so every error uses the JSON body.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Form, Json};

use astra_core::user::RegisterRequest;
use astra_core::BusinessInput;

use crate::error::AppError;

/// Request types with business rules beyond what serde checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

impl Validate for BusinessInput {
    fn validate(&self) -> Result<(), String> {
        BusinessInput::validate(self).map_err(|e| e.to_string())
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        RegisterRequest::validate(self).map_err(|e| e.to_string())
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract query parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a URL-encoded form, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result
        .map(|Form(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Check that a numeric parameter lies within `min..=max`.
pub fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<u32, AppError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(business_type: &str) -> BusinessInput {
        BusinessInput {
            business_type: business_type.to_string(),
            target_market: "Small teams in India".to_string(),
            monthly_budget: "$5,000".to_string(),
            primary_goal: "Reach 1,000 paying customers".to_string(),
            additional_info: None,
        }
    }

    #[test]
    fn valid_business_input_passes() {
        assert!(extract_validated_json(Ok(Json(input("SaaS")))).is_ok());
    }

    #[test]
    fn invalid_business_input_is_422() {
        let err = extract_validated_json(Ok(Json(input("<script>")))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn range_check_reports_bounds() {
        assert_eq!(check_range("weeks", 4, 1, 12).unwrap(), 4);
        let err = check_range("weeks", 13, 1, 12).unwrap_err();
        assert!(err.to_string().contains("between 1 and 12"));
        assert!(check_range("count", 0, 1, 30).is_err());
    }
}
