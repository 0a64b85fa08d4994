//! Expiry reaper - archives expired licenses into the used-licenses store

use super::Shutdown;
use crate::{
  entity::{license, used_license},
  prelude::*,
  state::Config,
};

/// One sweep: moves every active license whose end date has passed into
/// the archive, keyed by the same license key and carrying identical field
/// values, then removes it from the live store. The whole batch commits as
/// one transaction. Returns the number of licenses reaped.
pub async fn sweep(db: &DatabaseConnection) -> Result<u64> {
  let now = Utc::now().naive_utc();

  let expired = license::Entity::find()
    .filter(license::Column::IsActive.eq(true))
    .filter(license::Column::EndDate.lt(now))
    .all(db)
    .await?;

  if expired.is_empty() {
    return Ok(0);
  }

  let txn = db.begin().await?;

  for license in &expired {
    used_license::ActiveModel {
      license_key: Set(license.license_key.clone()),
      subscription_name: Set(license.subscription_name.clone()),
      duration_days: Set(license.duration_days),
      is_active: Set(license.is_active),
      username: Set(license.username.clone()),
      created_at: Set(license.created_at),
      end_date: Set(license.end_date),
      hwid: Set(license.hwid.clone()),
    }
    .insert(&txn)
    .await?;

    license::Entity::delete_by_id(license.license_key.as_str())
      .exec(&txn)
      .await?;
  }

  txn.commit().await?;
  Ok(expired.len() as u64)
}

/// Periodic loop. Runs once at startup, then reschedules itself: the
/// normal interval after a productive sweep, the longer idle interval when
/// nothing was expired. Errors are logged and the loop keeps going.
pub async fn run(db: DatabaseConnection, config: Config, shutdown: Shutdown) {
  loop {
    let delay = match sweep(&db).await {
      Ok(0) => {
        debug!("expiry sweep: no expired licenses");
        config.reap_idle_interval
      }
      Ok(reaped) => {
        info!("expiry sweep: {reaped} licenses archived");
        config.reap_interval
      }
      Err(err) => {
        error!("expiry sweep failed: {err}");
        config.reap_interval
      }
    };

    tokio::select! {
      _ = time::sleep(delay) => {}
      _ = shutdown.wait() => {
        info!("expiry reaper stopped");
        break;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{Database, DbBackend, Schema};

  use super::*;

  async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(license::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(used_license::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    db
  }

  async fn seed_license(
    db: &DatabaseConnection,
    key: &str,
    is_active: bool,
    end_date: Option<DateTime>,
  ) -> license::Model {
    license::ActiveModel {
      license_key: Set(key.to_string()),
      subscription_name: Set("pro".into()),
      duration_days: Set(30),
      is_active: Set(is_active),
      username: Set(Some("alice".into())),
      created_at: Set(Utc::now().naive_utc()),
      end_date: Set(end_date),
      hwid: Set(Some("HW-1".into())),
    }
    .insert(db)
    .await
    .unwrap()
  }

  #[tokio::test]
  async fn test_expired_license_is_archived_with_identical_fields() {
    let db = setup_test_db().await;
    let past = Utc::now().naive_utc() - TimeDelta::days(1);

    let original =
      seed_license(&db, "AAAA-BBBB-CCCC", true, Some(past)).await;

    let reaped = sweep(&db).await.unwrap();
    assert_eq!(reaped, 1);

    assert!(
      license::Entity::find_by_id("AAAA-BBBB-CCCC")
        .one(&db)
        .await
        .unwrap()
        .is_none()
    );

    let archived = used_license::Entity::find_by_id("AAAA-BBBB-CCCC")
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(archived.license_key, original.license_key);
    assert_eq!(archived.subscription_name, original.subscription_name);
    assert_eq!(archived.duration_days, original.duration_days);
    assert_eq!(archived.is_active, original.is_active);
    assert_eq!(archived.username, original.username);
    assert_eq!(archived.created_at, original.created_at);
    assert_eq!(archived.end_date, original.end_date);
    assert_eq!(archived.hwid, original.hwid);
  }

  #[tokio::test]
  async fn test_unexpired_and_inactive_licenses_survive() {
    let db = setup_test_db().await;
    let now = Utc::now().naive_utc();

    seed_license(&db, "LIVE-AAAA-0001", true, Some(now + TimeDelta::days(7)))
      .await;
    seed_license(&db, "IDLE-AAAA-0002", false, None).await;
    seed_license(&db, "IDLE-AAAA-0003", false, Some(now - TimeDelta::days(7)))
      .await;

    let reaped = sweep(&db).await.unwrap();
    assert_eq!(reaped, 0);

    assert_eq!(license::Entity::find().all(&db).await.unwrap().len(), 3);
    assert!(used_license::Entity::find().all(&db).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_sweep_reaps_the_whole_backlog_at_once() {
    let db = setup_test_db().await;
    let past = Utc::now().naive_utc() - TimeDelta::hours(1);

    for i in 0..5 {
      seed_license(&db, &format!("EXPD-AAAA-000{i}"), true, Some(past)).await;
    }

    let reaped = sweep(&db).await.unwrap();
    assert_eq!(reaped, 5);
    assert!(license::Entity::find().all(&db).await.unwrap().is_empty());
    assert_eq!(
      used_license::Entity::find().all(&db).await.unwrap().len(),
      5
    );
  }
}
