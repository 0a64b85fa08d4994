//! User accounts - registration, access levels, liveness, moderation

use sea_orm::SqlErr;
use uuid::Uuid;

use crate::{
  entity::user,
  prelude::*,
  sv, utils,
};

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Registers an account. Uniqueness is pre-checked for precise errors and
  /// backstopped by the unique indexes, so a racing duplicate still maps to
  /// the same conflict instead of leaking a raw store error.
  pub async fn register(
    &self,
    username: &str,
    email: &str,
    password_hash: &str,
    hwid: Option<String>,
  ) -> Result<user::Model> {
    utils::validate_username(username).map_err(Error::validation)?;
    utils::validate_email(email).map_err(Error::validation)?;

    if self.by_email(email).await?.is_some() {
      return Err(Error::EmailTaken);
    }
    if self.by_username(username).await?.is_some() {
      return Err(Error::UsernameTaken);
    }

    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      username: Set(username.to_string()),
      email: Set(email.to_string()),
      password_hash: Set(password_hash.to_string()),
      hwid: Set(hwid),
      is_banned: Set(false),
      is_active: Set(false),
      last_activity: Set(Some(now)),
      uac_level: Set(0),
      created_at: Set(now),
    };

    match user.insert(self.db).await {
      Ok(user) => Ok(user),
      Err(err) => match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail))
          if detail.contains("email") =>
        {
          Err(Error::EmailTaken)
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::UsernameTaken),
        _ => Err(err.into()),
      },
    }
  }

  pub async fn by_username(
    &self,
    username: &str,
  ) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::Username.eq(username))
      .one(self.db)
      .await?;
    Ok(user)
  }

  pub async fn by_email(&self, email: &str) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::Email.eq(email))
      .one(self.db)
      .await?;
    Ok(user)
  }

  async fn require(&self, username: &str) -> Result<user::Model> {
    self.by_username(username).await?.ok_or(Error::UserNotFound)
  }

  pub async fn set_uac(&self, username: &str, level: i32) -> Result<()> {
    if level < 0 {
      return Err(Error::validation("UAC level must be non-negative"));
    }

    let user = self.require(username).await?;
    user::ActiveModel { uac_level: Set(level), ..user.into() }
      .update(self.db)
      .await?;
    Ok(())
  }

  pub async fn uac(&self, username: &str) -> Result<i32> {
    Ok(self.require(username).await?.uac_level)
  }

  pub async fn validate_uac(&self, username: &str, required: i32) -> Result<()> {
    if self.require(username).await?.uac_level >= required {
      Ok(())
    } else {
      Err(Error::InsufficientUac)
    }
  }

  /// Heartbeat: refreshes the liveness signal read by the activity sweep.
  pub async fn touch_activity(&self, username: &str) -> Result<()> {
    let user = self.require(username).await?;
    user::ActiveModel {
      is_active: Set(true),
      last_activity: Set(Some(Utc::now().naive_utc())),
      ..user.into()
    }
    .update(self.db)
    .await?;
    Ok(())
  }

  pub async fn active_count(&self) -> Result<u64> {
    let count = user::Entity::find()
      .filter(user::Column::IsActive.eq(true))
      .count(self.db)
      .await?;
    Ok(count)
  }

  /// Bans the account; a bound hwid lands on the blacklist in the same
  /// transaction.
  pub async fn ban(&self, username: &str) -> Result<()> {
    let txn = self.db.begin().await?;

    let user = user::Entity::find()
      .filter(user::Column::Username.eq(username))
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    if let Some(hwid) = user.hwid.clone() {
      sv::hwid::blacklist(&txn, &hwid).await?;
    }

    user::ActiveModel { is_banned: Set(true), ..user.into() }
      .update(&txn)
      .await?;

    txn.commit().await?;
    Ok(())
  }

  pub async fn reset_password(
    &self,
    username: &str,
    new_hash: &str,
  ) -> Result<()> {
    let user = self.require(username).await?;
    user::ActiveModel {
      password_hash: Set(new_hash.to_string()),
      ..user.into()
    }
    .update(self.db)
    .await?;
    Ok(())
  }

  /// Admin override of the bound hwid. `None` returns the account to the
  /// unbound state, so the next client login binds afresh.
  pub async fn reset_hwid(
    &self,
    username: &str,
    hwid: Option<String>,
  ) -> Result<()> {
    let user = self.require(username).await?;
    user::ActiveModel { hwid: Set(hwid), ..user.into() }
      .update(self.db)
      .await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{Database, DbBackend, Schema};

  use super::*;
  use crate::entity::blacklist;

  async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(blacklist::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    db
  }

  #[tokio::test]
  async fn test_register_rejects_duplicates() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", None).await.unwrap();

    assert!(matches!(
      sv.register("bob", "alice@example.com", "hash", None).await,
      Err(Error::EmailTaken)
    ));
    assert!(matches!(
      sv.register("alice", "other@example.com", "hash", None).await,
      Err(Error::UsernameTaken)
    ));
  }

  #[tokio::test]
  async fn test_register_validates_format() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    assert!(matches!(
      sv.register("Alice", "alice@example.com", "hash", None).await,
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      sv.register("alice", "not-an-email", "hash", None).await,
      Err(Error::Validation(_))
    ));
  }

  #[tokio::test]
  async fn test_new_users_start_at_uac_zero() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", None).await.unwrap();

    assert_eq!(sv.uac("alice").await.unwrap(), 0);
    assert!(matches!(
      sv.validate_uac("alice", 1).await,
      Err(Error::InsufficientUac)
    ));

    sv.set_uac("alice", 2).await.unwrap();
    sv.validate_uac("alice", 1).await.unwrap();
    sv.validate_uac("alice", 2).await.unwrap();
  }

  #[tokio::test]
  async fn test_touch_activity_marks_user_active() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", None).await.unwrap();
    sv.touch_activity("alice").await.unwrap();

    let alice = sv.by_username("alice").await.unwrap().unwrap();
    assert!(alice.is_active);
    assert!(alice.last_activity.is_some());
    assert_eq!(sv.active_count().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn test_ban_blacklists_bound_hwid() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", Some("HW-1".into()))
      .await
      .unwrap();
    sv.ban("alice").await.unwrap();

    let alice = sv.by_username("alice").await.unwrap().unwrap();
    assert!(alice.is_banned);
    assert!(crate::sv::Hwid::new(&db).is_blacklisted("HW-1").await.unwrap());
  }

  #[tokio::test]
  async fn test_ban_without_hwid_blacklists_nothing() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", None).await.unwrap();
    sv.ban("alice").await.unwrap();

    let entries = blacklist::Entity::find().all(&db).await.unwrap();
    assert!(entries.is_empty());
  }

  #[tokio::test]
  async fn test_reset_hwid_unbinds() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register("alice", "alice@example.com", "hash", Some("HW-1".into()))
      .await
      .unwrap();
    sv.reset_hwid("alice", None).await.unwrap();

    let alice = sv.by_username("alice").await.unwrap().unwrap();
    assert_eq!(alice.hwid, None);
  }
}
