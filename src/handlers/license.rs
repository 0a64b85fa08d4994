//! License issuing, activation and read projections

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use crate::{prelude::*, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReq {
  #[serde(default)]
  pub subscription_name: Option<String>,
  #[serde(default)]
  pub duration: Option<i32>,
  #[serde(default)]
  pub quantity: Option<u32>,
}

pub async fn generate(
  State(app): State<Arc<AppState>>,
  Json(req): Json<GenerateReq>,
) -> Result<(StatusCode, Json<json::Value>)> {
  let (Some(name), Some(duration), Some(quantity)) =
    (req.subscription_name, req.duration, req.quantity)
  else {
    return Err(Error::validation(
      "Subscription name, duration (in days), and quantity are required",
    ));
  };

  let licenses =
    app.sv().license.generate_batch(&name, duration, quantity).await?;

  Ok((
    StatusCode::CREATED,
    Json(json::json!({
      "message": format!("{} licenses generated successfully", licenses.len()),
      "licenses": licenses,
    })),
  ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateReq {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub license_key: Option<String>,
}

pub async fn activate(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ActivateReq>,
) -> Result<Json<json::Value>> {
  let (Some(username), Some(key)) = (req.username, req.license_key) else {
    return Err(Error::validation("Username and license key are required"));
  };

  let end_date = app.sv().license.activate(&username, &key).await?;

  Ok(Json(json::json!({
    "message": "License activated successfully",
    "endDate": end_date,
  })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendReq {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub new_license_key: Option<String>,
}

pub async fn extend(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ExtendReq>,
) -> Result<Json<json::Value>> {
  let (Some(username), Some(new_key)) = (req.username, req.new_license_key)
  else {
    return Err(Error::validation(
      "Username and new license key are required",
    ));
  };

  let new_end_date =
    app.sv().license.extend_with_new_key(&username, &new_key).await?;

  Ok(Json(json::json!({
    "message": "Subscription extended successfully",
    "newEndDate": new_end_date,
  })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseKeyReq {
  #[serde(default)]
  pub license_key: Option<String>,
}

pub async fn reset_hwid(
  State(app): State<Arc<AppState>>,
  Json(req): Json<LicenseKeyReq>,
) -> Result<Json<json::Value>> {
  let Some(key) = req.license_key else {
    return Err(Error::validation("License key is required"));
  };

  app.sv().license.reset_hwid(&key).await?;

  Ok(Json(json::json!({
    "message": format!("HWID reset successfully for license key {key}"),
  })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionQuery {
  #[serde(default)]
  pub subscription_name: Option<String>,
}

pub async fn by_subscription(
  State(app): State<Arc<AppState>>,
  Query(query): Query<SubscriptionQuery>,
) -> Result<Json<json::Value>> {
  let Some(name) = query.subscription_name else {
    return Err(Error::validation("Subscription name is required"));
  };

  let licenses = app.sv().license.by_subscription(&name).await?;
  if licenses.is_empty() {
    return Err(Error::not_found("No licenses found for this subscription"));
  }

  Ok(Json(json::json!({ "licenses": licenses })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameQuery {
  #[serde(default)]
  pub username: Option<String>,
}

pub async fn by_username(
  State(app): State<Arc<AppState>>,
  Query(query): Query<UsernameQuery>,
) -> Result<Json<json::Value>> {
  let Some(username) = query.username else {
    return Err(Error::validation("Username is required"));
  };

  let licenses = app.sv().license.by_username(&username).await?;
  if licenses.is_empty() {
    return Err(Error::not_found("No licenses found for this user"));
  }

  Ok(Json(json::json!({ "licenses": licenses })))
}

pub async fn active(
  State(app): State<Arc<AppState>>,
) -> Result<Json<json::Value>> {
  let licenses = app.sv().license.active().await?;
  if licenses.is_empty() {
    return Err(Error::not_found("No active licenses found"));
  }

  Ok(Json(json::json!({ "activeLicenses": licenses })))
}

pub async fn inactive(
  State(app): State<Arc<AppState>>,
) -> Result<Json<json::Value>> {
  let licenses = app.sv().license.inactive().await?;
  if licenses.is_empty() {
    return Err(Error::not_found("No inactive licenses found"));
  }

  Ok(Json(json::json!({ "inactiveLicenses": licenses })))
}

pub async fn delete_used(
  State(app): State<Arc<AppState>>,
  Json(req): Json<LicenseKeyReq>,
) -> Result<Json<json::Value>> {
  let Some(key) = req.license_key else {
    return Err(Error::validation("License key is required"));
  };

  app.sv().license.delete_used(&key).await?;

  Ok(Json(json::json!({
    "message": format!("License {key} deleted successfully from used licenses."),
  })))
}
