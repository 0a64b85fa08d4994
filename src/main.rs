//! Nucleus - licensing and account management backend
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Axum for the HTTP API with rate limiting
//! - Tokio for the async runtime and the background sweeps

mod auth;
mod entity;
mod error;
mod handlers;
mod keygen;
mod migration;
mod prelude;
mod state;
mod sv;
mod sweep;
mod utils;

use std::{env, net::SocketAddr};

use axum::{
  Router, middleware,
  routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  prelude::*,
  state::{AppState, Config},
  sweep::Shutdown,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "nucleus=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:nucleus.db?mode=rwc".into());
  let secret = env::var("SERVER_SECRET").context("SERVER_SECRET not set")?;
  let config = Config::from_env()?;

  info!("Starting Nucleus v{}", env!("CARGO_PKG_VERSION"));

  let app_state = Arc::new(AppState::new(&db_url, secret, config).await?);
  let shutdown = Shutdown::new();

  // Ctrl-C stops the server and both sweeps
  {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
        shutdown.trigger();
      }
    });
  }

  let tracker = tokio::spawn(sweep::activity::run(
    app_state.db.clone(),
    app_state.config,
    shutdown.clone(),
  ));
  let reaper = tokio::spawn(sweep::expiry::run(
    app_state.db.clone(),
    app_state.config,
    shutdown.clone(),
  ));

  // Rate limiting (100 burst, refill 2/s per client ip)
  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(2)
      .burst_size(100)
      .finish()
      .context("Failed to build rate limiter config")?,
  );
  let limiter = governor_conf.limiter().clone();

  {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
      loop {
        tokio::select! {
          _ = time::sleep(Duration::from_secs(60)) => limiter.retain_recent(),
          _ = shutdown.wait() => break,
        }
      }
    });
  }

  let admin = Router::new()
    .route("/reset-password", post(handlers::admin::reset_password))
    .route("/reset-hwid", post(handlers::admin::reset_hwid))
    .route("/ban-user", post(handlers::admin::ban))
    .route_layer(middleware::from_fn_with_state(
      app_state.clone(),
      handlers::admin::require_admin,
    ));

  let licenses = Router::new()
    .route("/generate-licenses", post(handlers::license::generate))
    .route("/activate-license", post(handlers::license::activate))
    .route("/extend-subscription", post(handlers::license::extend))
    .route("/reset-hwid", post(handlers::license::reset_hwid))
    .route(
      "/licenses-by-subscription",
      get(handlers::license::by_subscription),
    )
    .route("/licenses-by-username", get(handlers::license::by_username))
    .route("/active-licenses", get(handlers::license::active))
    .route("/inactive-licenses", get(handlers::license::inactive))
    .route("/delete-used-license", delete(handlers::license::delete_used));

  let api = Router::new()
    .route("/register", post(handlers::auth::register))
    .route("/login", post(handlers::auth::login))
    .route("/login-web", post(handlers::auth::login_web))
    .route("/login-client", post(handlers::auth::login_client))
    .route("/user/{username}", get(handlers::user::profile))
    .route("/update-activity", post(handlers::user::update_activity))
    .route("/active-users", get(handlers::user::active_users))
    .route("/change-uac", post(handlers::user::change_uac))
    .route("/fetch-uac/{username}", get(handlers::user::fetch_uac))
    .route("/validate-uac", post(handlers::user::validate_uac))
    .nest("/licenses", licenses)
    .nest("/admin", admin);

  let router = Router::new()
    .route("/health", get(handlers::health))
    .nest("/api", api)
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app_state)
    .into_make_service_with_connect_info::<SocketAddr>();

  let port: u16 =
    env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener =
    tokio::net::TcpListener::bind(addr).await.context("Failed to bind")?;
  info!("HTTP server listening on {addr}");

  let serve_shutdown = shutdown.clone();
  axum::serve(listener, router)
    .with_graceful_shutdown(async move { serve_shutdown.wait().await })
    .await
    .context("Axum server error")?;

  // Let in-flight sweep batches finish before exiting.
  shutdown.trigger();
  let _ = tokio::join!(tracker, reaper);

  info!("Server stopped gracefully");
  Ok(())
}
