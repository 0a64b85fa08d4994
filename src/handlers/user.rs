//! User profile, UAC management and liveness endpoints

use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{entity::subscription, prelude::*, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRes {
  pub id: String,
  pub username: String,
  pub email: String,
  pub hwid: Option<String>,
  pub is_banned: bool,
  pub is_active: bool,
  pub last_activity: Option<DateTime>,
  pub uac_level: i32,
  pub created_at: DateTime,
  /// Computed from the subscriptions table on every read; there is no
  /// stored copy to drift from it.
  pub active_subscriptions: Vec<String>,
  pub subscriptions: Vec<subscription::Model>,
}

pub async fn profile(
  State(app): State<Arc<AppState>>,
  Path(username): Path<String>,
) -> Result<Json<ProfileRes>> {
  let sv = app.sv();
  let user =
    sv.user.by_username(&username).await?.ok_or(Error::UserNotFound)?;
  let subscriptions = sv.subscription.all_for(&user.id).await?;

  let active_subscriptions = subscriptions
    .iter()
    .filter(|sub| sub.is_active)
    .map(|sub| sub.subscription_name.clone())
    .collect();

  Ok(Json(ProfileRes {
    id: user.id,
    username: user.username,
    email: user.email,
    hwid: user.hwid,
    is_banned: user.is_banned,
    is_active: user.is_active,
    last_activity: user.last_activity,
    uac_level: user.uac_level,
    created_at: user.created_at,
    active_subscriptions,
    subscriptions,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUacReq {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub uac_level: Option<i32>,
}

pub async fn change_uac(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ChangeUacReq>,
) -> Result<Json<json::Value>> {
  let (Some(username), Some(level)) = (req.username, req.uac_level) else {
    return Err(Error::validation("Username and UAC level are required"));
  };

  app.sv().user.set_uac(&username, level).await?;

  Ok(Json(json::json!({
    "message": format!("User {username}'s access level updated to {level}"),
  })))
}

pub async fn fetch_uac(
  State(app): State<Arc<AppState>>,
  Path(username): Path<String>,
) -> Result<Json<json::Value>> {
  let level = app.sv().user.uac(&username).await?;
  Ok(Json(json::json!({ "uacLevel": level })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateUacReq {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub required_uac_level: Option<i32>,
}

pub async fn validate_uac(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ValidateUacReq>,
) -> Result<Json<json::Value>> {
  let (Some(username), Some(required)) = (req.username, req.required_uac_level)
  else {
    return Err(Error::validation(
      "Username and required UAC level are required",
    ));
  };

  app.sv().user.validate_uac(&username, required).await?;

  Ok(Json(json::json!({
    "message": "User has the required access level",
  })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityReq {
  #[serde(default)]
  pub username: Option<String>,
}

pub async fn update_activity(
  State(app): State<Arc<AppState>>,
  Json(req): Json<UpdateActivityReq>,
) -> Result<Json<json::Value>> {
  let Some(username) = req.username else {
    return Err(Error::validation("Username is required"));
  };

  app.sv().user.touch_activity(&username).await?;

  Ok(Json(json::json!({
    "message": "User activity updated successfully",
  })))
}

pub async fn active_users(
  State(app): State<Arc<AppState>>,
) -> Result<Json<json::Value>> {
  let count = app.sv().user.active_count().await?;
  Ok(Json(json::json!({ "count": count })))
}
