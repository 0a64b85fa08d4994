pub use std::{sync::Arc, time::Duration};

pub use anyhow::Context;
pub use chrono::{NaiveDateTime as DateTime, TimeDelta, Utc};
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection,
  EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
pub use sea_orm_migration::MigratorTrait;
pub use tokio::time;
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
