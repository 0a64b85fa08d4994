//! Registration and the three login flavors (unified, web, client)

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{subscription, user},
  prelude::*,
  state::AppState,
  utils,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
  pub username: String,
  pub email: String,
  pub password: String,
  #[serde(default)]
  pub hwid: Option<String>,
}

pub async fn register(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<json::Value>)> {
  utils::validate_password(&req.password).map_err(Error::validation)?;

  let hash = app.hasher.hash(&req.password)?;
  let user = app
    .sv()
    .user
    .register(&req.username, &req.email, &hash, req.hwid)
    .await?;

  Ok((
    StatusCode::CREATED,
    Json(json::json!({
      "message": format!("User {} created successfully", user.username),
      "userId": user.id,
    })),
  ))
}

/// Shared credential path: user lookup by email, ban check, then password
/// verification, in that order.
async fn authenticate(
  app: &AppState,
  email: &str,
  password: &str,
) -> Result<user::Model> {
  let user =
    app.sv().user.by_email(email).await?.ok_or(Error::BadCredentials)?;

  if user.is_banned {
    return Err(Error::Banned);
  }
  if !app.hasher.verify(password, &user.password_hash)? {
    return Err(Error::BadCredentials);
  }

  Ok(user)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
  pub email: String,
  pub password: String,
  #[serde(default)]
  pub hwid: Option<String>,
  #[serde(default)]
  pub application_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
  pub message: String,
  pub username: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub application_type: Option<String>,
}

pub async fn login(
  State(app): State<Arc<AppState>>,
  Json(req): Json<LoginReq>,
) -> Result<Json<LoginRes>> {
  let user = authenticate(&app, &req.email, &req.password).await?;

  if req.application_type.as_deref() == Some("client") {
    let hwid = req
      .hwid
      .as_deref()
      .ok_or_else(|| Error::validation("HWID is required for client login"))?;
    app.sv().hwid.verify(&user, hwid).await?;
  }

  app.sv().user.touch_activity(&user.username).await?;

  Ok(Json(LoginRes {
    message: "Login successful".into(),
    username: user.username,
    application_type: req.application_type,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebLoginReq {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
  pub message: String,
  pub user_id: String,
  pub username: String,
  pub active_subscriptions: Vec<subscription::Model>,
}

pub async fn login_web(
  State(app): State<Arc<AppState>>,
  Json(req): Json<WebLoginReq>,
) -> Result<Json<SessionRes>> {
  let user = authenticate(&app, &req.email, &req.password).await?;

  let active_subscriptions =
    app.sv().subscription.active_for(&user.id).await?;
  app.sv().user.touch_activity(&user.username).await?;

  Ok(Json(SessionRes {
    message: "Login successful".into(),
    user_id: user.id,
    username: user.username,
    active_subscriptions,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLoginReq {
  pub email: String,
  pub password: String,
  #[serde(default)]
  pub hwid: Option<String>,
}

pub async fn login_client(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ClientLoginReq>,
) -> Result<Json<SessionRes>> {
  let user = authenticate(&app, &req.email, &req.password).await?;

  let hwid = req
    .hwid
    .as_deref()
    .ok_or_else(|| Error::validation("HWID is required for client login"))?;
  app.sv().hwid.verify(&user, hwid).await?;

  let active_subscriptions =
    app.sv().subscription.active_for(&user.id).await?;
  app.sv().user.touch_activity(&user.username).await?;

  Ok(Json(SessionRes {
    message: "Login successful".into(),
    user_id: user.id,
    username: user.username,
    active_subscriptions,
  }))
}
