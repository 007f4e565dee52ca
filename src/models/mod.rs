pub mod forecast;
pub mod lunar;
pub mod scan;

pub use forecast::{EnergyForecast, EnergyPattern, InsightType, NextWeekForecast, PredictiveInsight};
pub use lunar::{
  CycleSync, DailyLunarForecast, EnergyAlignment, EnergyCategory, FeminineLunarAlignment,
  LunarInsight, LunarPhase, PhaseName,
};
pub use scan::{Center, HdType, ParseLabelError, Profile, ScanRecord, StoredScan, TimeOfDay};
