//! License entity - single-use keys unlocking subscription periods

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "licenses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub license_key: String,
  pub subscription_name: String,
  pub duration_days: i32,
  pub is_active: bool,
  /// Bound at activation, null while the key is unused.
  pub username: Option<String>,
  pub created_at: DateTime,
  /// Null until activated.
  pub end_date: Option<DateTime>,
  pub hwid: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
