//! Extractors whose rejections share the API's error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Present and non-blank, otherwise `Invalid request body`.
pub fn required(value: Option<String>) -> Result<String, ApiError> {
    value.filter(|v| !v.trim().is_empty()).ok_or(ApiError::InvalidBody)
}

/// Present and strictly positive.
pub fn positive(value: Option<i64>) -> Result<i64, ApiError> {
    value.filter(|v| *v > 0).ok_or(ApiError::InvalidBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_missing() {
        assert_eq!(required(Some("Ani".into())).unwrap(), "Ani");
        assert!(required(Some("   ".into())).is_err());
        assert!(required(None).is_err());
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert_eq!(positive(Some(3)).unwrap(), 3);
        assert!(positive(Some(0)).is_err());
        assert!(positive(Some(-4)).is_err());
        assert!(positive(None).is_err());
    }
}
