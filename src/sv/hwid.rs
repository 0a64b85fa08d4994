//! Hardware id guard - bind on first login, then require an exact match

use sea_orm::sea_query::OnConflict;

use crate::{
  entity::{blacklist, user},
  prelude::*,
};

pub struct Hwid<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Hwid<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn is_blacklisted(&self, hwid: &str) -> Result<bool> {
    let entry = blacklist::Entity::find_by_id(hwid).one(self.db).await?;
    Ok(entry.is_some())
  }

  /// Checks a presented hwid against the account. The blacklist is
  /// consulted first, so a blacklisted device is rejected even when it
  /// matches the bound value. An unbound account binds whatever the client
  /// presented.
  pub async fn verify(
    &self,
    user: &user::Model,
    presented: &str,
  ) -> Result<()> {
    if self.is_blacklisted(presented).await? {
      return Err(Error::HwidBlacklisted);
    }

    match user.hwid.as_deref() {
      None => {
        user::ActiveModel {
          hwid: Set(Some(presented.to_string())),
          ..user.clone().into()
        }
        .update(self.db)
        .await?;
        Ok(())
      }
      Some(bound) if bound == presented => Ok(()),
      Some(_) => Err(Error::HwidMismatch),
    }
  }
}

/// Puts a hwid on the blacklist. Idempotent; runs on the caller's
/// connection so banning can fold it into a transaction.
pub async fn blacklist<C: ConnectionTrait>(
  conn: &C,
  hwid: &str,
) -> Result<()> {
  let entry = blacklist::ActiveModel {
    hwid: Set(hwid.to_string()),
    created_at: Set(Utc::now().naive_utc()),
  };

  blacklist::Entity::insert(entry)
    .on_conflict(
      OnConflict::column(blacklist::Column::Hwid).do_nothing().to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use sea_orm::{Database, DbBackend, Schema};

  use super::*;
  use crate::sv;

  async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(blacklist::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    db
  }

  async fn seed_user(db: &DatabaseConnection) -> user::Model {
    sv::User::new(db)
      .register("alice", "alice@example.com", "hash", None)
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_first_login_binds_hwid() {
    let db = setup_test_db().await;
    let alice = seed_user(&db).await;

    sv::Hwid::new(&db).verify(&alice, "HW-1").await.unwrap();

    let alice = sv::User::new(&db).by_username("alice").await.unwrap().unwrap();
    assert_eq!(alice.hwid.as_deref(), Some("HW-1"));
  }

  #[tokio::test]
  async fn test_mismatched_hwid_rejected() {
    let db = setup_test_db().await;
    let alice = seed_user(&db).await;
    let sv = sv::Hwid::new(&db);

    sv.verify(&alice, "HW-1").await.unwrap();

    let alice = crate::sv::User::new(&db)
      .by_username("alice")
      .await
      .unwrap()
      .unwrap();
    assert!(matches!(
      sv.verify(&alice, "HW-2").await,
      Err(Error::HwidMismatch)
    ));
  }

  #[tokio::test]
  async fn test_blacklisted_hwid_rejected_even_when_bound() {
    let db = setup_test_db().await;
    let alice = seed_user(&db).await;
    let sv = sv::Hwid::new(&db);

    sv.verify(&alice, "HW-1").await.unwrap();
    blacklist(&db, "HW-1").await.unwrap();

    let alice = crate::sv::User::new(&db)
      .by_username("alice")
      .await
      .unwrap()
      .unwrap();
    assert!(matches!(
      sv.verify(&alice, "HW-1").await,
      Err(Error::HwidBlacklisted)
    ));
  }

  #[tokio::test]
  async fn test_blacklist_is_idempotent() {
    let db = setup_test_db().await;

    blacklist(&db, "HW-1").await.unwrap();
    blacklist(&db, "HW-1").await.unwrap();

    assert!(sv::Hwid::new(&db).is_blacklisted("HW-1").await.unwrap());
  }
}
