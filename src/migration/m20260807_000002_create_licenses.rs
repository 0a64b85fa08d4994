use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Licenses::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Licenses::LicenseKey)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Licenses::SubscriptionName).string().not_null(),
          )
          .col(ColumnDef::new(Licenses::DurationDays).integer().not_null())
          .col(
            ColumnDef::new(Licenses::IsActive)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Licenses::Username).string().null())
          .col(ColumnDef::new(Licenses::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Licenses::EndDate).date_time().null())
          .col(ColumnDef::new(Licenses::Hwid).string().null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_licenses_username")
          .table(Licenses::Table)
          .col(Licenses::Username)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_licenses_subscription")
          .table(Licenses::Table)
          .col(Licenses::SubscriptionName)
          .to_owned(),
      )
      .await?;

    // Composite index backing the expiry sweep's `is_active AND end_date <
    // now` filter.
    manager
      .create_index(
        Index::create()
          .name("idx_licenses_active_end_date")
          .table(Licenses::Table)
          .col(Licenses::IsActive)
          .col(Licenses::EndDate)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Licenses::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Licenses {
  Table,
  LicenseKey,
  SubscriptionName,
  DurationDays,
  IsActive,
  Username,
  CreatedAt,
  EndDate,
  Hwid,
}
