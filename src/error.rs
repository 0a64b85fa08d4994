//! Error types for the licensing server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("Invalid email or password")]
  BadCredentials,

  #[error("User not found")]
  UserNotFound,

  #[error("License not found")]
  LicenseNotFound,

  #[error("License not found or already activated")]
  LicenseUnavailable,

  #[error("Email is already in use")]
  EmailTaken,

  #[error("Username is already in use")]
  UsernameTaken,

  #[error("The new license key does not match the current subscription")]
  SubscriptionMismatch,

  #[error("User is banned")]
  Banned,

  #[error("HWID does not match")]
  HwidMismatch,

  #[error("Access denied. Your hardware ID is blacklisted.")]
  HwidBlacklisted,

  #[error("User does not have the required access level")]
  InsufficientUac,

  #[error("Access denied. Admins only.")]
  AdminOnly,

  #[error("Database error: {0}")]
  Db(#[from] sea_orm::DbErr),

  #[error("Internal error: {0}")]
  Internal(#[from] anyhow::Error),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::NotFound(message.into())
  }

  fn status(&self) -> StatusCode {
    match self {
      Error::Validation(_)
      | Error::BadCredentials
      | Error::EmailTaken
      | Error::UsernameTaken
      | Error::SubscriptionMismatch => StatusCode::BAD_REQUEST,
      Error::NotFound(_)
      | Error::UserNotFound
      | Error::LicenseNotFound
      | Error::LicenseUnavailable => StatusCode::NOT_FOUND,
      Error::Banned
      | Error::HwidMismatch
      | Error::HwidBlacklisted
      | Error::InsufficientUac
      | Error::AdminOnly => StatusCode::FORBIDDEN,
      Error::Db(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    // Store faults get their own log line so operators can tell a missing
    // index or an unreachable database apart from request-level failures.
    match &self {
      Error::Db(err) => tracing::error!("store failure: {err}"),
      Error::Internal(err) => tracing::error!("internal error: {err:#}"),
      _ => {}
    }

    let body = json::json!({ "error": self.to_string() });
    (self.status(), axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
