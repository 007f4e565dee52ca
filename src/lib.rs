pub mod cache;
pub mod commands;
pub mod config;
pub mod db;
pub mod forecast;
pub mod lunar;
pub mod models;
pub mod patterns;
pub mod report;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::AppConfig;
pub use db::AppState;
pub use forecast::generate_weekly_forecast;
pub use lunar::{generate_lunar_insights, get_current_lunar_phase};
pub use patterns::analyze_energy_patterns;

use log::{error, info};

/// Install the global logger. Safe to call more than once.
pub fn init_logging() {
  let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Load configuration, open the database and build the shared state
pub async fn init_app_state() -> Result<AppState, String> {
  init_logging();

  let config = AppConfig::from_env().map_err(|e| format!("Failed to load config: {}", e))?;
  let pool = match db::initialize_db(&config.database_url).await {
    Ok(pool) => pool,
    Err(e) => {
      error!("Failed to initialize database: {}", e);
      return Err(format!("Failed to initialize database: {}", e));
    }
  };

  info!("Database ready");
  Ok(AppState::new(pool, config))
}
