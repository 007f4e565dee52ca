//! Application configuration loaded from the environment (and `.env`)

use std::env;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DB_URL_VAR: &str = "ENERGY_SCAN_DB_URL";
pub const HISTORY_LIMIT_VAR: &str = "ENERGY_SCAN_HISTORY_LIMIT";
pub const INSIGHT_TTL_VAR: &str = "ENERGY_SCAN_INSIGHT_TTL_MINUTES";

const DEFAULT_DB_URL: &str = "sqlite://energy-scan.db?mode=rwc";
const DEFAULT_HISTORY_LIMIT: i64 = 100;
const DEFAULT_INSIGHT_TTL_MINUTES: i64 = 360;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {value}")]
  Invalid { name: &'static str, value: String },

  #[error("{name} must be greater than zero")]
  NotPositive { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub database_url: String,
  /// Scans loaded per forecast
  pub history_limit: i64,
  pub insight_ttl_minutes: i64,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DB_URL.to_string(),
      history_limit: DEFAULT_HISTORY_LIMIT,
      insight_ttl_minutes: DEFAULT_INSIGHT_TTL_MINUTES,
    }
  }
}

impl AppConfig {
  /// Read configuration, falling back to defaults for unset variables
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    Ok(Self {
      database_url: env::var(DB_URL_VAR).unwrap_or(defaults.database_url),
      history_limit: positive_var(HISTORY_LIMIT_VAR, defaults.history_limit)?,
      insight_ttl_minutes: positive_var(INSIGHT_TTL_VAR, defaults.insight_ttl_minutes)?,
    })
  }

  pub fn insight_ttl(&self) -> chrono::Duration {
    chrono::Duration::minutes(self.insight_ttl_minutes)
  }
}

fn positive_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
  T: FromStr + PartialOrd + Default,
{
  let value = match env::var(name) {
    Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
      name,
      value: raw.clone(),
    })?,
    Err(_) => return Ok(default),
  };

  if value <= T::default() {
    return Err(ConfigError::NotPositive { name });
  }
  Ok(value)
}
