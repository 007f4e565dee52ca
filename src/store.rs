//! Local persistence for scan history and user profiles
//!
//! The engine never touches the database; commands load history through
//! these helpers and hand plain `ScanRecord`s to the analysis functions.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sqlx::SqlitePool;

use crate::models::{Center, HdType, Profile, ScanRecord, StoredScan};

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Score is not a number")]
  InvalidScore,
}

/// ---------------------------------------------------------------------------
/// Scans
/// ---------------------------------------------------------------------------

/// Insert a scan, clamping the score into 0-100. Returns the new row id.
pub async fn insert_scan(
  pool: &SqlitePool,
  user_id: &str,
  scanned_at: DateTime<Utc>,
  score: f64,
  center: Option<Center>,
) -> Result<i64, StoreError> {
  if score.is_nan() {
    return Err(StoreError::InvalidScore);
  }
  let score = score.clamp(MIN_SCORE, MAX_SCORE);

  let result = sqlx::query(
    r#"
    INSERT INTO scans (user_id, scanned_at, score, center, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(user_id)
  .bind(scanned_at)
  .bind(score)
  .bind(center.map(|c| c.as_str()))
  .bind(Utc::now())
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}

/// Most recent scans first
pub async fn load_recent_scans(
  pool: &SqlitePool,
  user_id: &str,
  limit: i64,
) -> Result<Vec<ScanRecord>, StoreError> {
  let rows = sqlx::query_as::<_, StoredScan>(
    r#"
    SELECT id, user_id, scanned_at, score, center, created_at
    FROM scans
    WHERE user_id = ?1
    ORDER BY scanned_at DESC, id DESC
    LIMIT ?2
    "#,
  )
  .bind(user_id)
  .bind(limit)
  .fetch_all(pool)
  .await?;

  debug!("Loaded {} scans for {}", rows.len(), user_id);
  Ok(rows.iter().map(StoredScan::to_record).collect())
}

/// Scans at or after `since`, most recent first
pub async fn load_scans_since(
  pool: &SqlitePool,
  user_id: &str,
  since: DateTime<Utc>,
) -> Result<Vec<ScanRecord>, StoreError> {
  let rows = sqlx::query_as::<_, StoredScan>(
    r#"
    SELECT id, user_id, scanned_at, score, center, created_at
    FROM scans
    WHERE user_id = ?1 AND scanned_at >= ?2
    ORDER BY scanned_at DESC, id DESC
    "#,
  )
  .bind(user_id)
  .bind(since)
  .fetch_all(pool)
  .await?;

  Ok(rows.iter().map(StoredScan::to_record).collect())
}

/// ---------------------------------------------------------------------------
/// Profiles
/// ---------------------------------------------------------------------------

/// Insert or replace the profile fields; `None` clears a field
pub async fn upsert_profile(
  pool: &SqlitePool,
  user_id: &str,
  display_name: Option<&str>,
  hd_type: Option<HdType>,
  cycle_start_date: Option<NaiveDate>,
) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO profiles (user_id, display_name, hd_type, cycle_start_date, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(user_id) DO UPDATE SET
      display_name = excluded.display_name,
      hd_type = excluded.hd_type,
      cycle_start_date = excluded.cycle_start_date,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(user_id)
  .bind(display_name)
  .bind(hd_type.map(|t| t.as_str()))
  .bind(cycle_start_date)
  .bind(Utc::now())
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn load_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>, StoreError> {
  let profile = sqlx::query_as::<_, Profile>(
    r#"
    SELECT user_id, display_name, hd_type, cycle_start_date, updated_at
    FROM profiles
    WHERE user_id = ?1
    "#,
  )
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  Ok(profile)
}
