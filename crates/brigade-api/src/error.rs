//! API error type and its [`IntoResponse`] rendering.
//!
//! Error bodies are a flat `{"code": ..., "message": ...}` object. For
//! conflicts the code names the colliding field; for misses it names the
//! entity. Validation failures instead render the raw field→message map so
//! clients can attach each message to its input.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, or unverifiable credentials.
  #[error("unauthorized")]
  Unauthorized,

  /// A valid token without the right to perform this operation.
  #[error("not authorized: {0}")]
  Forbidden(String),

  /// Token minting failed.
  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error(transparent)]
  Core(#[from] brigade_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use brigade_core::Error as Core;
    match self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({
          "code": "Unauthorized",
          "message": "full authentication is required",
        })),
      )
        .into_response(),
      ApiError::Forbidden(message) => (
        StatusCode::FORBIDDEN,
        Json(json!({ "code": "NotAuthorized", "message": message })),
      )
        .into_response(),
      ApiError::Token(e) => {
        tracing::error!(error = %e, "token minting failed");
        internal()
      }
      ApiError::Core(Core::AlreadyExists { field, message }) => (
        StatusCode::CONFLICT,
        Json(json!({ "code": field, "message": message })),
      )
        .into_response(),
      ApiError::Core(Core::NotFound { entity, message }) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": entity, "message": message })),
      )
        .into_response(),
      ApiError::Core(Core::Validation(errors)) => {
        (StatusCode::BAD_REQUEST, Json(errors.0)).into_response()
      }
      ApiError::Core(e @ (Core::Hash(_) | Core::Storage(_))) => {
        tracing::error!(error = %e, "request failed");
        internal()
      }
    }
  }
}

fn internal() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({
      "code": "InternalServerError",
      "message": "internal server error",
    })),
  )
    .into_response()
}

#[cfg(test)]
mod tests {
  use super::*;
  use brigade_core::error::ValidationErrors;

  #[test]
  fn conflicts_render_the_field_as_the_code() {
    let err: ApiError =
      brigade_core::Error::already_exists("VAT", "Student with VAT number 1 already exists")
        .into();
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
  }

  #[test]
  fn misses_render_not_found() {
    let err: ApiError =
      brigade_core::Error::not_found("Course", "Course with id 9 not found").into();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn validation_renders_bad_request() {
    let mut errors = ValidationErrors::default();
    errors.push("vat", "VAT must be a 9-digit number");
    let err: ApiError = brigade_core::Error::from(errors).into();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn forbidden_renders_403() {
    let err = ApiError::Forbidden("path and body disagree".to_string());
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
  }
}
