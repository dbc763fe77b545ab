use actix_web::{
  HttpRequest, HttpResponse,
  error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
  http::{StatusCode, header::ContentType},
};
use std::fmt;
use validator::ValidationErrorsKind;

use crate::domain::auth::AuthError;
use crate::domain::consumer::ConsumerError;
use crate::domain::order::OrderError;
use crate::domain::vendor::VendorError;

use super::dtos::DetailResponse;

/// API error type that maps domain errors to HTTP responses.
///
/// Every variant renders as `{"detail": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
  /// Malformed or invalid input (422 Unprocessable Entity)
  Validation(String),

  /// Request rejected by a business rule (400 Bad Request)
  BadRequest(String),

  /// Named resource does not exist (404 Not Found)
  NotFound(String),

  /// Missing or invalid credentials (403 Forbidden)
  Forbidden(String),

  /// Concurrent writers kept colliding (409 Conflict)
  Conflict(String),

  /// Operation failed with a message safe to show (500)
  OperationFailed(String),

  /// Internal server error (500); details are logged, never returned
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::OperationFailed(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let detail = match self {
      ApiError::Validation(msg)
      | ApiError::BadRequest(msg)
      | ApiError::NotFound(msg)
      | ApiError::Forbidden(msg)
      | ApiError::Conflict(msg)
      | ApiError::OperationFailed(msg) => msg.clone(),
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        "Internal server error".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(DetailResponse::new(detail))
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::MissingCredentials | AuthError::InvalidScheme => {
        ApiError::Forbidden("Not authenticated".to_string())
      }
      AuthError::InvalidToken | AuthError::InvalidSubject(_) => {
        ApiError::Forbidden(AuthError::InvalidToken.to_string())
      }
      AuthError::SecretUndefined
      | AuthError::SecretFileNotFound(_)
      | AuthError::SecretFileUnreadable(_)
      | AuthError::UnsupportedAlgorithm(_)
      | AuthError::TokenCreation(_) => ApiError::Internal(error.to_string()),
    }
  }
}

impl From<VendorError> for ApiError {
  fn from(error: VendorError) -> Self {
    match error {
      VendorError::NotFound
      | VendorError::AlreadyExists
      | VendorError::NameOrEmailTaken
      | VendorError::InvalidFoodId => ApiError::BadRequest(error.to_string()),
      VendorError::NotFoundByName(_) | VendorError::FoodNotFound(_) => {
        ApiError::NotFound(error.to_string())
      }
      VendorError::MissingContact | VendorError::Validation(_) | VendorError::InvalidEmail(_) => {
        ApiError::Validation(error.to_string())
      }
      VendorError::StatusUpdateFailed(ref source) => {
        tracing::error!("Vendor status update failed: {}", source);
        ApiError::OperationFailed(error.to_string())
      }
      VendorError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
    }
  }
}

impl From<ConsumerError> for ApiError {
  fn from(error: ConsumerError) -> Self {
    match error {
      ConsumerError::NotFound
      | ConsumerError::AlreadyExists
      | ConsumerError::AlreadySigned
      | ConsumerError::EmailTaken => ApiError::BadRequest(error.to_string()),
      ConsumerError::MissingContact => ApiError::Validation(error.to_string()),
      ConsumerError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
    }
  }
}

impl From<OrderError> for ApiError {
  fn from(error: OrderError) -> Self {
    match error {
      OrderError::ConsumerNotFound
      | OrderError::VendorNotFound
      | OrderError::VendorNotRegistered
      | OrderError::InvalidFood(_)
      | OrderError::FoodUnavailable(_)
      | OrderError::PriceMismatch
      | OrderError::NotCancellable(_)
      | OrderError::InvalidStatusTransition { .. } => ApiError::BadRequest(error.to_string()),
      OrderError::ConsumerDisabled => ApiError::Forbidden(error.to_string()),
      OrderError::OrderNotFound(_) => ApiError::NotFound(error.to_string()),
      OrderError::NoFoods | OrderError::Validation(_) => ApiError::Validation(error.to_string()),
      OrderError::QueueContention => ApiError::Conflict(error.to_string()),
      OrderError::QueueMissing(_) => ApiError::Internal(error.to_string()),
      OrderError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
    }
  }
}

/// Convert validation errors from validator crate, including nested structs and lists
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages = Vec::new();
    collect_messages(&errors, &mut messages);
    messages.sort();
    messages.dedup();

    ApiError::Validation(messages.join(", "))
  }
}

fn collect_messages(errors: &validator::ValidationErrors, messages: &mut Vec<String>) {
  for (field, kind) in errors.errors() {
    match kind {
      ValidationErrorsKind::Field(errors) => {
        messages.extend(errors.iter().map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        }));
      }
      ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
      ValidationErrorsKind::List(items) => {
        for nested in items.values() {
          collect_messages(nested, messages);
        }
      }
    }
  }
}

/// Body deserialization failures answer 422 like field validation
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::Validation(err.to_string()).into()
}
