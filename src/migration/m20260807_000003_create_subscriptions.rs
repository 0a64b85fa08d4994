use sea_orm_migration::prelude::*;

use super::m20260807_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Subscriptions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Subscriptions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Subscriptions::UserId).string().not_null())
          .col(
            ColumnDef::new(Subscriptions::SubscriptionName)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(Subscriptions::StartDate).date_time().not_null(),
          )
          .col(ColumnDef::new(Subscriptions::EndDate).date_time().not_null())
          .col(
            ColumnDef::new(Subscriptions::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_subscriptions_user")
              .from(Subscriptions::Table, Subscriptions::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_subscriptions_user_name")
          .table(Subscriptions::Table)
          .col(Subscriptions::UserId)
          .col(Subscriptions::SubscriptionName)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Subscriptions {
  Table,
  Id,
  UserId,
  SubscriptionName,
  StartDate,
  EndDate,
  IsActive,
}
