use sea_orm::ConnectOptions;

use crate::{
  auth::{Argon2Hasher, PasswordHasher},
  migration::Migrator,
  prelude::*,
  sv,
};

/// Sweep cadence and thresholds. Values come from the environment as
/// humantime strings (`15m`, `1h`, ...), falling back to the defaults.
#[derive(Debug, Clone, Copy)]
pub struct Config {
  pub activity_interval: Duration,
  pub activity_timeout: Duration,
  pub reap_interval: Duration,
  pub reap_idle_interval: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      activity_interval: Duration::from_secs(15 * 60),
      activity_timeout: Duration::from_secs(15 * 60),
      reap_interval: Duration::from_secs(10 * 60),
      reap_idle_interval: Duration::from_secs(15 * 60),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Ok(raw) = std::env::var("ACTIVITY_INTERVAL") {
      config.activity_interval =
        humantime::parse_duration(&raw).context("invalid ACTIVITY_INTERVAL")?;
    }
    if let Ok(raw) = std::env::var("ACTIVITY_TIMEOUT") {
      config.activity_timeout =
        humantime::parse_duration(&raw).context("invalid ACTIVITY_TIMEOUT")?;
    }
    if let Ok(raw) = std::env::var("REAP_INTERVAL") {
      config.reap_interval =
        humantime::parse_duration(&raw).context("invalid REAP_INTERVAL")?;
    }
    if let Ok(raw) = std::env::var("REAP_IDLE_INTERVAL") {
      config.reap_idle_interval = humantime::parse_duration(&raw)
        .context("invalid REAP_IDLE_INTERVAL")?;
    }

    Ok(config)
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub license: sv::License<'a>,
  pub subscription: sv::Subscription<'a>,
  pub hwid: sv::Hwid<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub hasher: Arc<dyn PasswordHasher>,
  pub secret: String,
  pub config: Config,
}

impl AppState {
  pub async fn new(
    db_url: &str,
    secret: String,
    config: Config,
  ) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let mut opts = ConnectOptions::new(db_url);
    opts
      .connect_timeout(Duration::from_secs(5))
      .acquire_timeout(Duration::from_secs(5))
      .sqlx_logging(false);
    let db = Database::connect(opts)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self { db, hasher: Arc::new(Argon2Hasher), secret, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      license: sv::License::new(&self.db),
      subscription: sv::Subscription::new(&self.db),
      hwid: sv::Hwid::new(&self.db),
    }
  }
}
