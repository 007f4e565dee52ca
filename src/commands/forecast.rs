use crate::db::AppState;
use crate::forecast::{analyze_feminine_cycle, generate_weekly_forecast, CYCLE_WINDOW_DAYS};
use crate::models::EnergyForecast;
use crate::report::forecast_report;
use crate::store;
use chrono::{DateTime, Duration, Utc};

/// ---------------------------------------------------------------------------
/// Weekly Forecast Commands
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, serde::Serialize)]
pub struct ForecastExport {
  pub filename: String,
  pub contents: String,
}

/// Seven-day forecast from the user's stored history, with the cycle
/// insight appended when a rhythm is detected
pub async fn get_weekly_forecast(state: &AppState, user_id: &str) -> Result<EnergyForecast, String> {
  weekly_forecast_at(state, user_id, Utc::now()).await
}

pub(crate) async fn weekly_forecast_at(
  state: &AppState,
  user_id: &str,
  now: DateTime<Utc>,
) -> Result<EnergyForecast, String> {
  let history = store::load_recent_scans(&state.db, user_id, state.config.history_limit)
    .await
    .map_err(|e| format!("Failed to fetch scans for forecast: {}", e))?;

  // The cycle window is read in full, independent of the history limit
  let since = now - Duration::days(CYCLE_WINDOW_DAYS);
  let window = store::load_scans_since(&state.db, user_id, since)
    .await
    .map_err(|e| format!("Failed to fetch scans for cycle analysis: {}", e))?;

  let mut forecast = generate_weekly_forecast(&history, now);
  if let Some(cycle) = analyze_feminine_cycle(&window, now) {
    forecast.insights.push(cycle);
  }

  Ok(forecast)
}

/// Forecast rendered as a downloadable text file
pub async fn export_forecast_report(state: &AppState, user_id: &str) -> Result<ForecastExport, String> {
  let now = Utc::now();
  let forecast = weekly_forecast_at(state, user_id, now).await?;

  Ok(ForecastExport {
    filename: format!("energy-forecast-{}.txt", now.format("%Y-%m-%d")),
    contents: forecast_report(&forecast, now),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::models::InsightType;
  use crate::test_utils::{seed_test_scans, setup_test_db, teardown_test_db, utc};

  #[tokio::test]
  async fn test_forecast_without_history_uses_defaults() {
    let state = AppState::new(setup_test_db().await, AppConfig::default());

    let forecast = weekly_forecast_at(&state, "nobody", utc(2024, 5, 10, 9)).await.unwrap();
    assert_eq!(forecast.next_week.expected_score, 50);
    assert!(forecast.insights.is_empty());

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_forecast_includes_cycle_insight() {
    let state = AppState::new(setup_test_db().await, AppConfig::default());
    let now = utc(2024, 5, 10, 9);
    seed_test_scans(&state.db, "u1", 20, now).await;

    let forecast = weekly_forecast_at(&state, "u1", now).await.unwrap();

    // Scores 40..=46 over the last week
    assert_eq!(forecast.next_week.expected_score, 43);
    assert_eq!(forecast.patterns.len(), 7);
    assert!(forecast
      .insights
      .iter()
      .any(|i| i.insight_type == InsightType::CyclePattern));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_cycle_insight_ignores_history_limit() {
    let config = AppConfig {
      history_limit: 5,
      ..AppConfig::default()
    };
    let state = AppState::new(setup_test_db().await, config);
    let now = utc(2024, 5, 10, 9);
    seed_test_scans(&state.db, "u1", 20, now).await;

    let forecast = weekly_forecast_at(&state, "u1", now).await.unwrap();

    // Five scans reach the pattern analyzer, all twenty the cycle check
    assert_eq!(forecast.patterns.len(), 5);
    assert!(forecast
      .insights
      .iter()
      .any(|i| i.insight_type == InsightType::CyclePattern));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_export_forecast_report() {
    let state = AppState::new(setup_test_db().await, AppConfig::default());

    let export = export_forecast_report(&state, "nobody").await.unwrap();
    assert!(export.filename.starts_with("energy-forecast-"));
    assert!(export.filename.ends_with(".txt"));
    assert!(export.contents.contains("Expected score: 50/100"));

    teardown_test_db(state.db).await;
  }
}
