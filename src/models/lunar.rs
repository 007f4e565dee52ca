use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
  NewMoon,
  WaxingCrescent,
  FirstQuarter,
  WaxingGibbous,
  FullMoon,
  WaningGibbous,
  LastQuarter,
  WaningCrescent,
}

impl PhaseName {
  pub fn as_str(&self) -> &'static str {
    match self {
      PhaseName::NewMoon => "new_moon",
      PhaseName::WaxingCrescent => "waxing_crescent",
      PhaseName::FirstQuarter => "first_quarter",
      PhaseName::WaxingGibbous => "waxing_gibbous",
      PhaseName::FullMoon => "full_moon",
      PhaseName::WaningGibbous => "waning_gibbous",
      PhaseName::LastQuarter => "last_quarter",
      PhaseName::WaningCrescent => "waning_crescent",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyCategory {
  Introspective,
  Growing,
  Active,
  Releasing,
}

/// Static reference data for one of the eight phases
#[derive(Debug, PartialEq, Serialize)]
pub struct LunarPhase {
  pub name: PhaseName,
  pub display_name: &'static str,
  pub emoji: &'static str,
  pub energy: EnergyCategory,
  pub description: &'static str,
  pub recommendations: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyAlignment {
  Aligned,
  Neutral,
  Challenging,
}

impl EnergyAlignment {
  pub fn as_str(&self) -> &'static str {
    match self {
      EnergyAlignment::Aligned => "aligned",
      EnergyAlignment::Neutral => "neutral",
      EnergyAlignment::Challenging => "challenging",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LunarInsight {
  pub date: NaiveDate,
  pub current_phase: &'static LunarPhase,
  pub days_in_phase: u32,
  pub next_phase: &'static LunarPhase,
  pub days_to_next_phase: u32,
  pub expected_energy: u32,
  pub energy_alignment: EnergyAlignment,
  pub personalized_message: String,
  pub recommendations: Vec<String>,
  /// Recent scans that fell inside the current phase
  pub scans_in_phase: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLunarForecast {
  pub date: NaiveDate,
  pub phase: &'static LunarPhase,
  pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSync {
  Synchronized,
  Complementary,
  Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeminineLunarAlignment {
  pub cycle_day: u32,
  pub alignment: CycleSync,
  pub insight: String,
  pub recommendations: Vec<String>,
}
