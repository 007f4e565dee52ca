//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::models::{Center, EnergyPattern, ScanRecord, TimeOfDay};
use crate::patterns::confidence_for;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed `count` daily scans for a user, newest first, scores cycling 40..=79
pub async fn seed_test_scans(pool: &SqlitePool, user_id: &str, count: usize, now: DateTime<Utc>) -> Vec<i64> {
  let mut ids = Vec::new();

  for i in 0..count {
    let scanned_at = now - Duration::days(i as i64);
    let score = 40.0 + (i % 40) as f64;
    let center = if i % 2 == 0 { Some(Center::Sacral) } else { None };

    let id = crate::store::insert_scan(pool, user_id, scanned_at, score, center)
      .await
      .expect("Failed to insert test scan");
    ids.push(id);
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// UTC timestamp on the hour
pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, hour, 0, 0)
    .single()
    .expect("valid test date")
}

/// Scan on `day` days into the month; days past the month's end roll forward
pub fn mock_scan(year: i32, month: u32, day: u32, hour: u32, score: f64) -> ScanRecord {
  mock_scan_with_center(year, month, day, hour, score, None)
}

pub fn mock_scan_with_center(
  year: i32,
  month: u32,
  day: u32,
  hour: u32,
  score: f64,
  center: Option<Center>,
) -> ScanRecord {
  ScanRecord {
    date: utc(year, month, 1, hour) + Duration::days(day as i64 - 1),
    score,
    center,
  }
}

/// Pattern with confidence derived from `frequency`, no center
pub fn mock_pattern(time_of_day: TimeOfDay, day_of_week: u32, average_score: f64, frequency: u32) -> EnergyPattern {
  EnergyPattern {
    time_of_day,
    day_of_week,
    average_score,
    dominant_center: None,
    frequency,
    confidence: confidence_for(frequency),
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff: f64 = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('scans', 'profiles')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_scans_returns_correct_count() {
    let pool = setup_test_db().await;

    let ids = seed_test_scans(&pool, "seed-user", 6, utc(2024, 5, 1, 9)).await;
    assert_eq!(ids.len(), 6);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scans WHERE user_id = ?1")
      .bind("seed-user")
      .fetch_one(&pool)
      .await
      .expect("Failed to count scans");
    assert_eq!(count, 6);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_scan_rolls_past_month_end() {
    let scan = mock_scan(2024, 1, 36, 8, 50.0);
    assert_eq!(scan.date, utc(2024, 2, 5, 8));
    assert_eq!(scan.day_of_week(), 1);
  }

  #[test]
  fn test_mock_pattern_confidence() {
    let p = mock_pattern(TimeOfDay::Evening, 5, 80.0, 5);
    assert_approx_eq!(p.confidence, 0.5, 1e-9);
    assert!(p.dominant_center.is_none());
  }
}
