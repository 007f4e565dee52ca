use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::scan::{Center, TimeOfDay};

/// Aggregate statistics for one (time of day, weekday) bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPattern {
  pub time_of_day: TimeOfDay,
  /// 0 = Sunday .. 6 = Saturday
  pub day_of_week: u32,
  pub average_score: f64,
  /// Last center folded into the bucket, not a mode
  pub dominant_center: Option<Center>,
  pub frequency: u32,
  pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
  EnergyDip,
  EnergyPeak,
  CenterActivation,
  CyclePattern,
}

impl InsightType {
  pub fn as_str(&self) -> &'static str {
    match self {
      InsightType::EnergyDip => "energy_dip",
      InsightType::EnergyPeak => "energy_peak",
      InsightType::CenterActivation => "center_activation",
      InsightType::CyclePattern => "cycle_pattern",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveInsight {
  #[serde(rename = "type")]
  pub insight_type: InsightType,
  pub prediction: String,
  pub confidence: f64,
  pub timeframe: String,
  pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextWeekForecast {
  pub expected_score: u32,
  pub risk_days: Vec<NaiveDate>,
  pub opportunity_days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyForecast {
  pub next_week: NextWeekForecast,
  pub patterns: Vec<EnergyPattern>,
  pub insights: Vec<PredictiveInsight>,
}
