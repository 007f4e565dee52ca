use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;

use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::models::LunarInsight;

pub type DbPool = SqlitePool;

/// Lunar insights cached per (user, day)
pub type InsightCache = TtlCache<(String, chrono::NaiveDate), LunarInsight>;

/// Application state shared by the command layer
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
  pub insight_cache: Mutex<InsightCache>,
}

impl AppState {
  pub fn new(db: DbPool, config: AppConfig) -> Self {
    let insight_cache = Mutex::new(TtlCache::new(config.insight_ttl()));
    Self {
      db,
      config,
      insight_cache,
    }
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
  info!("Initializing database at: {}", database_url);

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
