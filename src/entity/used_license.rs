//! Archive of expired licenses, mirroring the live license columns

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "used_licenses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub license_key: String,
  pub subscription_name: String,
  pub duration_days: i32,
  pub is_active: bool,
  pub username: Option<String>,
  pub created_at: DateTime,
  pub end_date: Option<DateTime>,
  pub hwid: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
