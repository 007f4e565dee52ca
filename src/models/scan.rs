use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Error returned when a stored or user-supplied label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseLabelError {
  pub kind: &'static str,
  pub value: String,
}

impl ParseLabelError {
  fn new(kind: &'static str, value: &str) -> Self {
    Self {
      kind,
      value: value.to_string(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Time of Day
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
  Morning,   // hour < 12
  Afternoon, // hour < 18
  Evening,
}

impl TimeOfDay {
  pub fn from_hour(hour: u32) -> Self {
    match hour {
      h if h < 12 => TimeOfDay::Morning,
      h if h < 18 => TimeOfDay::Afternoon,
      _ => TimeOfDay::Evening,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      TimeOfDay::Morning => "morning",
      TimeOfDay::Afternoon => "afternoon",
      TimeOfDay::Evening => "evening",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Human Design Centers
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
  Head,
  Ajna,
  Throat,
  G,
  Heart,
  Sacral,
  SolarPlexus,
  Spleen,
  Root,
}

impl Center {
  pub const ALL: [Center; 9] = [
    Center::Head,
    Center::Ajna,
    Center::Throat,
    Center::G,
    Center::Heart,
    Center::Sacral,
    Center::SolarPlexus,
    Center::Spleen,
    Center::Root,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Center::Head => "head",
      Center::Ajna => "ajna",
      Center::Throat => "throat",
      Center::G => "g",
      Center::Heart => "heart",
      Center::Sacral => "sacral",
      Center::SolarPlexus => "solar_plexus",
      Center::Spleen => "spleen",
      Center::Root => "root",
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Center::Head => "Head",
      Center::Ajna => "Ajna",
      Center::Throat => "Throat",
      Center::G => "G (Identity)",
      Center::Heart => "Heart (Will)",
      Center::Sacral => "Sacral",
      Center::SolarPlexus => "Solar Plexus",
      Center::Spleen => "Spleen",
      Center::Root => "Root",
    }
  }
}

impl FromStr for Center {
  type Err = ParseLabelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
    Center::ALL
      .iter()
      .copied()
      .find(|c| c.as_str() == normalized)
      .ok_or_else(|| ParseLabelError::new("center", s))
  }
}

/// ---------------------------------------------------------------------------
/// Human Design Type
/// ---------------------------------------------------------------------------

/// Only used to pick canned text, never to change arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HdType {
  Generator,
  Projector,
  ManifestingGenerator,
  Manifestor,
  Reflector,
}

impl HdType {
  pub fn as_str(&self) -> &'static str {
    match self {
      HdType::Generator => "generator",
      HdType::Projector => "projector",
      HdType::ManifestingGenerator => "manifesting-generator",
      HdType::Manifestor => "manifestor",
      HdType::Reflector => "reflector",
    }
  }
}

impl std::fmt::Display for HdType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for HdType {
  type Err = ParseLabelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
      "generator" => Ok(Self::Generator),
      "projector" => Ok(Self::Projector),
      "manifesting-generator" => Ok(Self::ManifestingGenerator),
      "manifestor" => Ok(Self::Manifestor),
      "reflector" => Ok(Self::Reflector),
      _ => Err(ParseLabelError::new("hd type", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Scan Records
/// ---------------------------------------------------------------------------

/// A single self-reported energy scan, as handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
  pub date: DateTime<Utc>,
  /// 0-100 by convention
  pub score: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub center: Option<Center>,
}

impl ScanRecord {
  pub fn time_of_day(&self) -> TimeOfDay {
    TimeOfDay::from_hour(self.date.hour())
  }

  /// 0 = Sunday .. 6 = Saturday
  pub fn day_of_week(&self) -> u32 {
    self.date.weekday().num_days_from_sunday()
  }
}

/// Row shape of the `scans` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredScan {
  pub id: i64,
  pub user_id: String,
  pub scanned_at: DateTime<Utc>,
  pub score: f64,
  pub center: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

impl StoredScan {
  /// Unknown center labels degrade to `None` rather than dropping the scan
  pub fn to_record(&self) -> ScanRecord {
    ScanRecord {
      date: self.scanned_at,
      score: self.score,
      center: self.center.as_deref().and_then(|c| c.parse().ok()),
    }
  }
}

/// Row shape of the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
  pub user_id: String,
  pub display_name: Option<String>,
  pub hd_type: Option<String>,
  pub cycle_start_date: Option<NaiveDate>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
  pub fn hd_type(&self) -> Option<HdType> {
    self.hd_type.as_deref().and_then(|t| t.parse().ok())
  }
}
