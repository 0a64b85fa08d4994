//! License lifecycle - batch generation, activation, extension, queries

use sea_orm::sea_query::Expr;

use crate::{
  entity::{license, used_license, user},
  keygen,
  prelude::*,
  sv,
};

pub struct License<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> License<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Issues `quantity` inactive licenses for a subscription. Items are
  /// persisted one by one; a mid-batch store failure leaves the earlier
  /// licenses in place and surfaces the error, so callers must treat an
  /// error as possibly partial success.
  pub async fn generate_batch(
    &self,
    subscription_name: &str,
    duration_days: i32,
    quantity: u32,
  ) -> Result<Vec<license::Model>> {
    if subscription_name.is_empty() {
      return Err(Error::validation("Subscription name is required"));
    }
    if duration_days <= 0 {
      return Err(Error::validation(
        "Duration must be a positive number of days",
      ));
    }
    if quantity == 0 {
      return Err(Error::validation("Quantity must be at least 1"));
    }

    let mut licenses = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
      let key = keygen::unique_key(self.db).await?;
      let now = Utc::now().naive_utc();

      let license = license::ActiveModel {
        license_key: Set(key),
        subscription_name: Set(subscription_name.to_string()),
        duration_days: Set(duration_days),
        is_active: Set(false),
        username: Set(None),
        created_at: Set(now),
        end_date: Set(None),
        hwid: Set(None),
      };

      licenses.push(license.insert(self.db).await?);
    }

    Ok(licenses)
  }

  /// Activates an unused license for a user: extends the user's active
  /// subscription of the same name, or starts a new one from now. The
  /// subscription write and the activation mark commit as one transaction;
  /// the mark is conditional on the license still being inactive, so a
  /// concurrent activation of the same key loses the race and rolls back.
  pub async fn activate(&self, username: &str, key: &str) -> Result<DateTime> {
    let txn = self.db.begin().await?;

    let license = license::Entity::find()
      .filter(license::Column::LicenseKey.eq(key))
      .filter(license::Column::IsActive.eq(false))
      .one(&txn)
      .await?
      .ok_or(Error::LicenseUnavailable)?;

    let user = user::Entity::find()
      .filter(user::Column::Username.eq(username))
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    let end_date = sv::subscription::extend_or_start(
      &txn,
      &user.id,
      &license.subscription_name,
      license.duration_days,
    )
    .await?;

    let marked = license::Entity::update_many()
      .col_expr(license::Column::IsActive, Expr::value(true))
      .col_expr(license::Column::EndDate, Expr::value(end_date))
      .col_expr(license::Column::Username, Expr::value(username))
      .filter(license::Column::LicenseKey.eq(key))
      .filter(license::Column::IsActive.eq(false))
      .exec(&txn)
      .await?;

    // Zero affected rows means someone else activated the key since our
    // read; dropping the transaction rolls the subscription write back.
    if marked.rows_affected == 0 {
      return Err(Error::LicenseUnavailable);
    }

    txn.commit().await?;
    Ok(end_date)
  }

  /// Consumes a second unused key of the same subscription name to push the
  /// user's current active license further out. The consumed key is deleted
  /// outright; unlike expiry it never reaches the used-licenses archive.
  pub async fn extend_with_new_key(
    &self,
    username: &str,
    new_key: &str,
  ) -> Result<DateTime> {
    let txn = self.db.begin().await?;

    let current = license::Entity::find()
      .filter(license::Column::Username.eq(username))
      .filter(license::Column::IsActive.eq(true))
      .one(&txn)
      .await?
      .ok_or(Error::LicenseNotFound)?;

    let fresh = license::Entity::find()
      .filter(license::Column::LicenseKey.eq(new_key))
      .filter(license::Column::IsActive.eq(false))
      .one(&txn)
      .await?
      .ok_or(Error::LicenseUnavailable)?;

    if current.subscription_name != fresh.subscription_name {
      return Err(Error::SubscriptionMismatch);
    }

    let base = current.end_date.unwrap_or_else(|| Utc::now().naive_utc());
    let new_end = base + TimeDelta::days(fresh.duration_days as i64);
    let consumed_key = fresh.license_key.clone();

    license::ActiveModel { end_date: Set(Some(new_end)), ..current.into() }
      .update(&txn)
      .await?;

    license::Entity::delete_by_id(consumed_key.as_str()).exec(&txn).await?;

    txn.commit().await?;
    Ok(new_end)
  }

  /// Clears the hwid recorded on the license; the user's bound hwid is a
  /// separate field and stays as it is.
  pub async fn reset_hwid(&self, key: &str) -> Result<()> {
    let license = license::Entity::find()
      .filter(license::Column::LicenseKey.eq(key))
      .one(self.db)
      .await?
      .ok_or(Error::LicenseNotFound)?;

    license::ActiveModel { hwid: Set(None), ..license.into() }
      .update(self.db)
      .await?;

    Ok(())
  }

  pub async fn by_subscription(
    &self,
    name: &str,
  ) -> Result<Vec<license::Model>> {
    let licenses = license::Entity::find()
      .filter(license::Column::SubscriptionName.eq(name))
      .all(self.db)
      .await?;
    Ok(licenses)
  }

  pub async fn by_username(
    &self,
    username: &str,
  ) -> Result<Vec<license::Model>> {
    let licenses = license::Entity::find()
      .filter(license::Column::Username.eq(username))
      .all(self.db)
      .await?;
    Ok(licenses)
  }

  pub async fn active(&self) -> Result<Vec<license::Model>> {
    let licenses = license::Entity::find()
      .filter(license::Column::IsActive.eq(true))
      .all(self.db)
      .await?;
    Ok(licenses)
  }

  pub async fn inactive(&self) -> Result<Vec<license::Model>> {
    let licenses = license::Entity::find()
      .filter(license::Column::IsActive.eq(false))
      .all(self.db)
      .await?;
    Ok(licenses)
  }

  pub async fn delete_used(&self, key: &str) -> Result<()> {
    let res = used_license::Entity::delete_by_id(key).exec(self.db).await?;
    if res.rows_affected == 0 {
      return Err(Error::LicenseNotFound);
    }
    Ok(())
  }
}
