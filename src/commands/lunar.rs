use crate::db::AppState;
use crate::lunar::{
  self, analyze_feminine_lunar_alignment, cycle_day_from_start, generate_lunar_insights,
  generate_reflector_guidance, get_current_lunar_phase,
};
use crate::models::{DailyLunarForecast, FeminineLunarAlignment, LunarInsight};
use crate::report::lunar_report;
use crate::store;
use chrono::{DateTime, Utc};
use log::debug;

/// Score assumed when the user has not scanned yet
const NEUTRAL_SCORE: f64 = 50.0;

/// ---------------------------------------------------------------------------
/// Lunar Insight Commands
/// ---------------------------------------------------------------------------

/// Today's lunar insight for a user, cached per user and day
pub async fn get_lunar_insight(state: &AppState, user_id: &str) -> Result<LunarInsight, String> {
  lunar_insight_at(state, user_id, Utc::now()).await
}

pub(crate) async fn lunar_insight_at(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<LunarInsight, String> {
  let key = (user_id.to_string(), now.date_naive());

  // Held until the insert so a concurrent write's invalidation lands after it
  let mut cache = state.insight_cache.lock().await;
  if let Some(cached) = cache.get(&key, now) {
    debug!("Lunar insight cache hit for {}", user_id);
    return Ok(cached.clone());
  }

  let insight = compute_lunar_insight(state, user_id, now).await?;

  let purged = cache.purge_expired(now);
  if purged > 0 {
    debug!("Purged {} expired lunar insights", purged);
  }
  cache.insert(key, insight.clone(), now);
  Ok(insight)
}

async fn compute_lunar_insight(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<LunarInsight, String> {
  let recent = store::load_recent_scans(&state.db, user_id, state.config.history_limit)
    .await
    .map_err(|e| format!("Failed to fetch scans for lunar insight: {}", e))?;
  let profile = store::load_profile(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  let current_score = recent.first().map_or(NEUTRAL_SCORE, |s| s.score);
  let hd_type = profile.as_ref().and_then(|p| p.hd_type());
  Ok(generate_lunar_insights(current_score, &recent, hd_type, now))
}

/// Phase and suggestions for the next seven days
pub async fn get_weekly_lunar_forecast() -> Result<Vec<DailyLunarForecast>, String> {
  Ok(lunar::get_weekly_lunar_forecast(Utc::now()))
}

/// Reflector-specific guidance for the current phase
pub async fn get_reflector_guidance(state: &AppState, user_id: &str) -> Result<Vec<String>, String> {
  let insight = get_lunar_insight(state, user_id).await?;
  Ok(generate_reflector_guidance(&insight))
}

/// How the user's menstrual cycle lines up with the Moon today
pub async fn get_feminine_lunar_alignment(
  state: &AppState,
  user_id: &str,
) -> Result<FeminineLunarAlignment, String> {
  feminine_alignment_at(state, user_id, Utc::now()).await
}

pub(crate) async fn feminine_alignment_at(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<FeminineLunarAlignment, String> {
  let profile = store::load_profile(&state.db, user_id)
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  let cycle_start = profile
    .and_then(|p| p.cycle_start_date)
    .ok_or_else(|| "No cycle start date recorded".to_string())?;
  let cycle_day = cycle_day_from_start(cycle_start, now.date_naive())
    .ok_or_else(|| "Cycle start date is in the future".to_string())?;

  Ok(analyze_feminine_lunar_alignment(cycle_day, get_current_lunar_phase(now)))
}

/// Lunar insight rendered as text
pub async fn export_lunar_report(state: &AppState, user_id: &str) -> Result<String, String> {
  let insight = get_lunar_insight(state, user_id).await?;
  Ok(lunar_report(&insight))
}
