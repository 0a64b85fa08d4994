//! Subscription ledger - at most one active period per (user, name)

use crate::{entity::subscription, prelude::*};

pub struct Subscription<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Subscription<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn all_for(
    &self,
    user_id: &str,
  ) -> Result<Vec<subscription::Model>> {
    let subs = subscription::Entity::find()
      .filter(subscription::Column::UserId.eq(user_id))
      .order_by_asc(subscription::Column::StartDate)
      .all(self.db)
      .await?;
    Ok(subs)
  }

  pub async fn active_for(
    &self,
    user_id: &str,
  ) -> Result<Vec<subscription::Model>> {
    let subs = subscription::Entity::find()
      .filter(subscription::Column::UserId.eq(user_id))
      .filter(subscription::Column::IsActive.eq(true))
      .order_by_asc(subscription::Column::StartDate)
      .all(self.db)
      .await?;
    Ok(subs)
  }

}

/// Extends the user's active subscription of `name` by `days`, or starts a
/// new one from now. Runs on the caller's connection so license activation
/// can fold it into a transaction.
pub async fn extend_or_start<C: ConnectionTrait>(
  conn: &C,
  user_id: &str,
  name: &str,
  days: i32,
) -> Result<DateTime> {
  let active = subscription::Entity::find()
    .filter(subscription::Column::UserId.eq(user_id))
    .filter(subscription::Column::SubscriptionName.eq(name))
    .filter(subscription::Column::IsActive.eq(true))
    .one(conn)
    .await?;

  let now = Utc::now().naive_utc();

  match active {
    Some(sub) => {
      let end = sub.end_date + TimeDelta::days(days as i64);
      subscription::ActiveModel { end_date: Set(end), ..sub.into() }
        .update(conn)
        .await?;
      Ok(end)
    }
    None => {
      let end = now + TimeDelta::days(days as i64);
      subscription::ActiveModel {
        user_id: Set(user_id.to_string()),
        subscription_name: Set(name.to_string()),
        start_date: Set(now),
        end_date: Set(end),
        is_active: Set(true),
        ..Default::default()
      }
      .insert(conn)
      .await?;
      Ok(end)
    }
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{Database, DbBackend, Schema};

  use super::*;
  use crate::entity::user;

  async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(subscription::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    user::ActiveModel {
      id: Set("u-1".into()),
      username: Set("alice".into()),
      email: Set("alice@example.com".into()),
      password_hash: Set("hash".into()),
      hwid: Set(None),
      is_banned: Set(false),
      is_active: Set(false),
      last_activity: Set(None),
      uac_level: Set(0),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&db)
    .await
    .unwrap();

    db
  }

  #[tokio::test]
  async fn test_first_period_starts_from_now() {
    let db = setup_test_db().await;

    let end = extend_or_start(&db, "u-1", "pro", 30).await.unwrap();

    let expected = Utc::now().naive_utc() + TimeDelta::days(30);
    assert!((end - expected).num_seconds().abs() < 5);

    let subs = Subscription::new(&db).active_for("u-1").await.unwrap();
    assert_eq!(subs.len(), 1);
    assert!(subs[0].is_active);
  }

  #[tokio::test]
  async fn test_second_period_extends_in_place() {
    let db = setup_test_db().await;

    let first = extend_or_start(&db, "u-1", "pro", 30).await.unwrap();
    let second = extend_or_start(&db, "u-1", "pro", 30).await.unwrap();

    assert_eq!(second, first + TimeDelta::days(30));

    // Still one row per (user, name); the period was extended, not
    // duplicated.
    let subs = Subscription::new(&db).all_for("u-1").await.unwrap();
    assert_eq!(subs.len(), 1);
  }

  #[tokio::test]
  async fn test_different_names_get_their_own_periods() {
    let db = setup_test_db().await;

    extend_or_start(&db, "u-1", "pro", 30).await.unwrap();
    extend_or_start(&db, "u-1", "vip", 7).await.unwrap();

    let subs = Subscription::new(&db).active_for("u-1").await.unwrap();
    assert_eq!(subs.len(), 2);
  }
}
