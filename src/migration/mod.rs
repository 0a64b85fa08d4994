//! Database migrations using SeaORM

use sea_orm_migration::prelude::*;

mod m20260807_000001_create_users;
mod m20260807_000002_create_licenses;
mod m20260807_000003_create_subscriptions;
mod m20260807_000004_create_used_licenses;
mod m20260807_000005_create_blacklist;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260807_000001_create_users::Migration),
      Box::new(m20260807_000002_create_licenses::Migration),
      Box::new(m20260807_000003_create_subscriptions::Migration),
      Box::new(m20260807_000004_create_used_licenses::Migration),
      Box::new(m20260807_000005_create_blacklist::Migration),
    ]
  }
}
