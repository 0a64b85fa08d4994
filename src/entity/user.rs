//! User entity - account, hwid binding and liveness state

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  #[sea_orm(unique)]
  pub username: String,
  #[sea_orm(unique)]
  pub email: String,
  pub password_hash: String,
  /// Set once at first client login, immutable until an admin reset.
  pub hwid: Option<String>,
  pub is_banned: bool,
  pub is_active: bool,
  pub last_activity: Option<DateTime>,
  pub uac_level: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::subscription::Entity")]
  Subscriptions,
}

impl Related<super::subscription::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Subscriptions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
