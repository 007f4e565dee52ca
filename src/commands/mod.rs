pub mod forecast;
pub mod lunar;

use crate::db::AppState;
use crate::models::{Center, EnergyPattern, HdType, Profile};
use crate::patterns::analyze_energy_patterns;
use crate::store;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

/// ---------------------------------------------------------------------------
/// Scan Commands
/// ---------------------------------------------------------------------------

/// Record a new scan taken now. Unknown center labels are rejected.
pub async fn record_scan(
  state: &AppState,
  user_id: &str,
  score: f64,
  center: Option<String>,
) -> Result<i64, String> {
  record_scan_at(state, user_id, score, center, Utc::now()).await
}

pub(crate) async fn record_scan_at(
  state: &AppState,
  user_id: &str,
  score: f64,
  center: Option<String>,
  now: DateTime<Utc>,
) -> Result<i64, String> {
  let center = center
    .as_deref()
    .map(str::parse::<Center>)
    .transpose()
    .map_err(|e| e.to_string())?;

  let id = store::insert_scan(&state.db, user_id, now, score, center)
    .await
    .map_err(|e| format!("Failed to record scan: {}", e))?;

  // A new score changes today's alignment
  state
    .insight_cache
    .lock()
    .await
    .invalidate(&(user_id.to_string(), now.date_naive()));

  info!("Recorded scan {} for {}", id, user_id);
  Ok(id)
}

pub async fn get_energy_patterns(state: &AppState, user_id: &str) -> Result<Vec<EnergyPattern>, String> {
  let history = store::load_recent_scans(&state.db, user_id, state.config.history_limit)
    .await
    .map_err(|e| format!("Failed to load scans: {}", e))?;

  Ok(analyze_energy_patterns(&history))
}

/// ---------------------------------------------------------------------------
/// Profile Commands
/// ---------------------------------------------------------------------------

pub async fn get_profile(state: &AppState, user_id: &str) -> Result<Option<Profile>, String> {
  store::load_profile(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))
}

pub async fn update_profile(
  state: &AppState,
  user_id: &str,
  display_name: Option<String>,
  hd_type: Option<String>,
  cycle_start_date: Option<NaiveDate>,
) -> Result<(), String> {
  update_profile_at(state, user_id, display_name, hd_type, cycle_start_date, Utc::now()).await
}

pub(crate) async fn update_profile_at(
  state: &AppState,
  user_id: &str,
  display_name: Option<String>,
  hd_type: Option<String>,
  cycle_start_date: Option<NaiveDate>,
  now: DateTime<Utc>,
) -> Result<(), String> {
  let hd_type = hd_type
    .as_deref()
    .map(str::parse::<HdType>)
    .transpose()
    .map_err(|e| e.to_string())?;

  store::upsert_profile(&state.db, user_id, display_name.as_deref(), hd_type, cycle_start_date)
    .await
    .map_err(|e| format!("Failed to update profile: {}", e))?;

  // HD type feeds the cached lunar recommendations
  state
    .insight_cache
    .lock()
    .await
    .invalidate(&(user_id.to_string(), now.date_naive()));

  Ok(())
}
