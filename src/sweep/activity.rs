//! Activity tracker - flips users inactive once their heartbeat goes stale

use sea_orm::sea_query::Expr;

use super::Shutdown;
use crate::{entity::user, prelude::*, state::Config};

/// One sweep: every active user whose `last_activity` predates the cutoff
/// loses the active flag. Users that never reported activity are left
/// alone. Returns the number of users flipped.
pub async fn sweep(
  db: &DatabaseConnection,
  timeout: Duration,
) -> Result<u64> {
  let staleness = TimeDelta::from_std(timeout)
    .unwrap_or_else(|_| TimeDelta::minutes(15));
  let cutoff = Utc::now().naive_utc() - staleness;

  let res = user::Entity::update_many()
    .col_expr(user::Column::IsActive, Expr::value(false))
    .filter(user::Column::IsActive.eq(true))
    .filter(user::Column::LastActivity.lt(cutoff))
    .exec(db)
    .await?;

  Ok(res.rows_affected)
}

/// Periodic loop. The first tick fires immediately; a failed iteration is
/// logged and the loop keeps going.
pub async fn run(db: DatabaseConnection, config: Config, shutdown: Shutdown) {
  let mut interval = time::interval(config.activity_interval);

  loop {
    tokio::select! {
      _ = interval.tick() => {
        match sweep(&db, config.activity_timeout).await {
          Ok(0) => debug!("activity sweep: nothing stale"),
          Ok(flipped) => {
            info!("activity sweep: {flipped} users marked inactive");
          }
          Err(err) => error!("activity sweep failed: {err}"),
        }
      }
      _ = shutdown.wait() => {
        info!("activity tracker stopped");
        break;
      }
    }
  }
}
