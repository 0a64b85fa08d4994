use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(UsedLicenses::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(UsedLicenses::LicenseKey)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(UsedLicenses::SubscriptionName)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(UsedLicenses::DurationDays).integer().not_null(),
          )
          .col(ColumnDef::new(UsedLicenses::IsActive).boolean().not_null())
          .col(ColumnDef::new(UsedLicenses::Username).string().null())
          .col(
            ColumnDef::new(UsedLicenses::CreatedAt).date_time().not_null(),
          )
          .col(ColumnDef::new(UsedLicenses::EndDate).date_time().null())
          .col(ColumnDef::new(UsedLicenses::Hwid).string().null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UsedLicenses::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum UsedLicenses {
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
