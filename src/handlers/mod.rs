//! HTTP surface

pub mod admin;
pub mod auth;
pub mod license;
pub mod user;

pub async fn health() -> &'static str {
  "OK"
}
