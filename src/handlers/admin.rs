//! Admin surface, guarded by the shared server secret

use axum::{
  Json,
  extract::{Request, State},
  middleware::Next,
  response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{prelude::*, state::AppState, utils};

/// Shared-secret guard: the token arrives in the `x-admin-token` header and
/// must equal `SERVER_SECRET`.
pub async fn require_admin(
  State(app): State<Arc<AppState>>,
  req: Request,
  next: Next,
) -> Response {
  let authorized = req
    .headers()
    .get("x-admin-token")
    .and_then(|value| value.to_str().ok())
    .is_some_and(|token| token == app.secret);

  if authorized {
    next.run(req).await
  } else {
    Error::AdminOnly.into_response()
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordReq {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub new_password: Option<String>,
}

pub async fn reset_password(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ResetPasswordReq>,
) -> Result<Json<json::Value>> {
  let (Some(username), Some(new_password)) = (req.username, req.new_password)
  else {
    return Err(Error::validation("Username and new password are required"));
  };
  utils::validate_password(&new_password).map_err(Error::validation)?;

  let hash = app.hasher.hash(&new_password)?;
  app.sv().user.reset_password(&username, &hash).await?;

  Ok(Json(json::json!({ "message": "Password reset successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetHwidReq {
  #[serde(default)]
  pub username: Option<String>,
  /// Absent clears the binding; the next client login binds afresh.
  #[serde(default)]
  pub new_hwid: Option<String>,
}

pub async fn reset_hwid(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ResetHwidReq>,
) -> Result<Json<json::Value>> {
  let Some(username) = req.username else {
    return Err(Error::validation("Username is required"));
  };

  app.sv().user.reset_hwid(&username, req.new_hwid).await?;

  Ok(Json(json::json!({ "message": "HWID reset successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanReq {
  #[serde(default)]
  pub username: Option<String>,
}

pub async fn ban(
  State(app): State<Arc<AppState>>,
  Json(req): Json<BanReq>,
) -> Result<Json<json::Value>> {
  let Some(username) = req.username else {
    return Err(Error::validation("Username is required"));
  };

  app.sv().user.ban(&username).await?;

  Ok(Json(json::json!({
    "message": format!("User {username} banned successfully"),
  })))
}
