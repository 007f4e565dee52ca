//! Lunar phase calculation and energy alignment
//!
//! The phase is a pure function of the calendar day: whole days since a
//! reference new moon (2024-01-11 UTC), folded into a 29.53 day cycle and
//! split into eight equal phases. The alignment side compares a user's
//! current score with the energy expected for that phase and picks canned
//! guidance text.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;

use crate::models::{
  CycleSync, DailyLunarForecast, EnergyAlignment, EnergyCategory, FeminineLunarAlignment, HdType,
  LunarInsight, LunarPhase, PhaseName, ScanRecord,
};

/// ---------------------------------------------------------------------------
/// Cycle Constants
/// ---------------------------------------------------------------------------

/// 2024-01-11T00:00:00Z, a known new moon
pub const REFERENCE_NEW_MOON_TIMESTAMP: i64 = 1_704_931_200;
pub const LUNAR_CYCLE_DAYS: f64 = 29.53;
const PHASE_COUNT: usize = 8;
const SECONDS_PER_DAY: i64 = 86_400;

const ALIGNED_MAX_DIFF: f64 = 20.0;
const NEUTRAL_MAX_DIFF: f64 = 40.0;

pub static LUNAR_PHASES: [LunarPhase; PHASE_COUNT] = [
  LunarPhase {
    name: PhaseName::NewMoon,
    display_name: "New Moon",
    emoji: "🌑",
    energy: EnergyCategory::Introspective,
    description: "A time for rest, reflection and setting intentions",
    recommendations: &[
      "Set clear intentions for the cycle ahead",
      "Rest and turn inward",
      "Journal about what you want to grow",
      "Keep your schedule light",
    ],
  },
  LunarPhase {
    name: PhaseName::WaxingCrescent,
    display_name: "Waxing Crescent",
    emoji: "🌒",
    energy: EnergyCategory::Growing,
    description: "Intentions begin to take root",
    recommendations: &[
      "Take the first small steps on new plans",
      "Gather resources and support",
      "Nurture new ideas without judging them",
      "Stay curious and open",
    ],
  },
  LunarPhase {
    name: PhaseName::FirstQuarter,
    display_name: "First Quarter",
    emoji: "🌓",
    energy: EnergyCategory::Growing,
    description: "A time of challenge and decisive action",
    recommendations: &[
      "Push through resistance with steady effort",
      "Make the decisions you have been postponing",
      "Adjust plans as obstacles appear",
      "Celebrate small wins",
    ],
  },
  LunarPhase {
    name: PhaseName::WaxingGibbous,
    display_name: "Waxing Gibbous",
    emoji: "🌔",
    energy: EnergyCategory::Active,
    description: "Refine, adjust and build momentum",
    recommendations: &[
      "Refine your work and pay attention to detail",
      "Stay patient as things ripen",
      "Keep your energy focused",
      "Check in with your body before taking on more",
    ],
  },
  LunarPhase {
    name: PhaseName::FullMoon,
    display_name: "Full Moon",
    emoji: "🌕",
    energy: EnergyCategory::Active,
    description: "Peak illumination, culmination and heightened emotion",
    recommendations: &[
      "Celebrate what has come to fruition",
      "Notice heightened emotions without reacting",
      "Connect and share with others",
      "Release what has been brought to light",
    ],
  },
  LunarPhase {
    name: PhaseName::WaningGibbous,
    display_name: "Waning Gibbous",
    emoji: "🌖",
    energy: EnergyCategory::Releasing,
    description: "Gratitude, sharing and integration",
    recommendations: &[
      "Share what you have learned",
      "Practice gratitude",
      "Integrate recent experiences",
      "Begin slowing down",
    ],
  },
  LunarPhase {
    name: PhaseName::LastQuarter,
    display_name: "Last Quarter",
    emoji: "🌗",
    energy: EnergyCategory::Releasing,
    description: "Release, forgive and clear space",
    recommendations: &[
      "Let go of what no longer serves you",
      "Declutter your space and schedule",
      "Forgive yourself and others",
      "Reflect on lessons from this cycle",
    ],
  },
  LunarPhase {
    name: PhaseName::WaningCrescent,
    display_name: "Waning Crescent",
    emoji: "🌘",
    energy: EnergyCategory::Introspective,
    description: "Surrender, rest and recuperate",
    recommendations: &[
      "Prioritize deep rest and sleep",
      "Limit social commitments",
      "Meditate or spend quiet time alone",
      "Prepare gently for the next cycle",
    ],
  },
];

/// ---------------------------------------------------------------------------
/// Phase Calculation
/// ---------------------------------------------------------------------------

/// Where a date sits in the cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
  pub days_since_epoch: i64,
  /// Day within the cycle, in [0, 29.53)
  pub lunar_day: f64,
  pub phase_index: usize,
}

impl LunarPosition {
  pub fn at(date: DateTime<Utc>) -> Self {
    let days_since_epoch = days_since_epoch(date);
    let lunar_day = (days_since_epoch as f64).rem_euclid(LUNAR_CYCLE_DAYS);
    let position = lunar_day / LUNAR_CYCLE_DAYS;
    let phase_index = ((position * PHASE_COUNT as f64).floor().max(0.0) as usize).min(PHASE_COUNT - 1);

    Self {
      days_since_epoch,
      lunar_day,
      phase_index,
    }
  }

  pub fn phase(&self) -> &'static LunarPhase {
    &LUNAR_PHASES[self.phase_index]
  }

  pub fn next_phase(&self) -> &'static LunarPhase {
    &LUNAR_PHASES[(self.phase_index + 1) % PHASE_COUNT]
  }

  /// 1-based day count within the current phase
  pub fn days_in_phase(&self) -> u32 {
    let phase_start = self.phase_index as f64 * phase_length();
    (self.lunar_day - phase_start).max(0.0).floor() as u32 + 1
  }

  pub fn days_to_next_phase(&self) -> u32 {
    let phase_end = (self.phase_index + 1) as f64 * phase_length();
    (phase_end - self.lunar_day).ceil().max(1.0) as u32
  }
}

fn phase_length() -> f64 {
  LUNAR_CYCLE_DAYS / PHASE_COUNT as f64
}

/// Whole days since the reference new moon, floored (negative before it)
fn days_since_epoch(date: DateTime<Utc>) -> i64 {
  (date.timestamp() - REFERENCE_NEW_MOON_TIMESTAMP).div_euclid(SECONDS_PER_DAY)
}

pub fn get_current_lunar_phase(date: DateTime<Utc>) -> &'static LunarPhase {
  LunarPosition::at(date).phase()
}

/// Phase and two suggestions for each of the seven days starting today
pub fn get_weekly_lunar_forecast(now: DateTime<Utc>) -> Vec<DailyLunarForecast> {
  (0..7)
    .map(|i| {
      let date = now + Duration::days(i);
      let phase = get_current_lunar_phase(date);
      DailyLunarForecast {
        date: date.date_naive(),
        phase,
        recommendations: phase.recommendations.iter().take(2).map(|r| r.to_string()).collect(),
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Energy Alignment
/// ---------------------------------------------------------------------------

impl EnergyCategory {
  /// Score a user would typically report in a phase of this kind
  pub fn expected_energy(&self) -> u32 {
    match self {
      EnergyCategory::Introspective => 45,
      EnergyCategory::Growing => 65,
      EnergyCategory::Active => 80,
      EnergyCategory::Releasing => 55,
    }
  }
}

/// Upper bounds are exclusive: a gap of exactly 20 is neutral, exactly 40 challenging
pub fn classify_alignment(score: f64, expected: f64) -> EnergyAlignment {
  let diff = (score - expected).abs();
  if diff < ALIGNED_MAX_DIFF {
    EnergyAlignment::Aligned
  } else if diff < NEUTRAL_MAX_DIFF {
    EnergyAlignment::Neutral
  } else {
    EnergyAlignment::Challenging
  }
}

/// The message tables only distinguish four broad phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageBucket {
  NewMoon,
  FullMoon,
  Waxing,
  Waning,
}

impl From<PhaseName> for MessageBucket {
  fn from(name: PhaseName) -> Self {
    match name {
      PhaseName::NewMoon => MessageBucket::NewMoon,
      PhaseName::WaxingCrescent | PhaseName::FirstQuarter | PhaseName::WaxingGibbous => {
        MessageBucket::Waxing
      }
      PhaseName::FullMoon => MessageBucket::FullMoon,
      PhaseName::WaningGibbous | PhaseName::LastQuarter | PhaseName::WaningCrescent => {
        MessageBucket::Waning
      }
    }
  }
}

fn table_message(alignment: EnergyAlignment, bucket: MessageBucket) -> Option<&'static str> {
  let message = match (alignment, bucket) {
    (EnergyAlignment::Aligned, MessageBucket::NewMoon) => {
      "Your quiet, inward energy mirrors the New Moon. This is a powerful moment to plant seeds of intention."
    }
    (EnergyAlignment::Aligned, MessageBucket::FullMoon) => {
      "You are shining with the Full Moon. Let this bright energy carry your most important work and connections."
    }
    (EnergyAlignment::Aligned, MessageBucket::Waxing) => {
      "Your rising energy is in step with the waxing Moon. Keep building steadily on what you have started."
    }
    (EnergyAlignment::Aligned, MessageBucket::Waning) => {
      "Your softer energy flows with the waning Moon. Trust this time for release and rest."
    }
    (EnergyAlignment::Challenging, MessageBucket::NewMoon) => {
      "Your energy feels out of step with the New Moon's call for stillness. Channel it into planning rather than doing."
    }
    (EnergyAlignment::Challenging, MessageBucket::FullMoon) => {
      "The Full Moon's intensity may feel far away today. Illumination can also mean seeing what needs rest."
    }
    (EnergyAlignment::Challenging, MessageBucket::Waxing) => {
      "The Moon is building while your energy moves differently. Take small steps and let momentum return in its own time."
    }
    (EnergyAlignment::Challenging, MessageBucket::Waning) => {
      "The waning Moon asks for release, but your energy is moving another way. Notice what you are holding onto."
    }
    // No dedicated table for neutral days
    (EnergyAlignment::Neutral, _) => return None,
  };
  Some(message)
}

fn personalized_message(alignment: EnergyAlignment, phase: &LunarPhase, score: f64) -> String {
  match table_message(alignment, phase.name.into()) {
    Some(message) => message.to_string(),
    None => format!(
      "{} The {} is here. Your energy score of {:.0} invites you to notice how this phase moves through you.",
      phase.emoji, phase.display_name, score
    ),
  }
}

/// Compare today's score with the energy expected for the current phase
pub fn generate_lunar_insights(
  current_score: f64,
  recent_scans: &[ScanRecord],
  hd_type: Option<HdType>,
  now: DateTime<Utc>,
) -> LunarInsight {
  let position = LunarPosition::at(now);
  let phase = position.phase();
  let expected_energy = phase.energy.expected_energy();
  let energy_alignment = classify_alignment(current_score, expected_energy as f64);
  let days_in_phase = position.days_in_phase();

  let mut recommendations: Vec<String> = phase.recommendations.iter().map(|r| r.to_string()).collect();
  match energy_alignment {
    EnergyAlignment::Aligned => {
      recommendations.push("Trust this natural flow and lean into the phase's theme".to_string());
    }
    EnergyAlignment::Challenging => {
      recommendations.push("Be extra gentle with yourself during this phase".to_string());
      recommendations.push("Don't force alignment; small adjustments are enough".to_string());
    }
    EnergyAlignment::Neutral => {}
  }
  if hd_type == Some(HdType::Reflector) {
    recommendations.push("As a Reflector, you are especially attuned to the lunar cycle".to_string());
    recommendations.push("Give major decisions a full lunar cycle before committing".to_string());
  }

  let scans_in_phase = recent_scans
    .iter()
    .filter(|s| {
      let elapsed = position.days_since_epoch - days_since_epoch(s.date);
      (0..days_in_phase as i64).contains(&elapsed)
    })
    .count();

  debug!(
    "Lunar insight: {} day {}, score {:.0} vs expected {} -> {}",
    phase.name.as_str(),
    days_in_phase,
    current_score,
    expected_energy,
    energy_alignment.as_str()
  );

  LunarInsight {
    date: now.date_naive(),
    current_phase: phase,
    days_in_phase,
    next_phase: position.next_phase(),
    days_to_next_phase: position.days_to_next_phase(),
    expected_energy,
    energy_alignment,
    personalized_message: personalized_message(energy_alignment, phase, current_score),
    recommendations,
    scans_in_phase,
  }
}

/// Phase-specific guidance for Reflectors
pub fn generate_reflector_guidance(insight: &LunarInsight) -> Vec<String> {
  let lines: [&str; 2] = match insight.current_phase.name {
    PhaseName::NewMoon => [
      "Take time alone to reset your energy field",
      "Notice which environments feel clean and clear to you",
    ],
    PhaseName::WaxingCrescent => [
      "Sample new environments and people lightly",
      "Observe what energies you are amplifying",
    ],
    PhaseName::FirstQuarter => [
      "Notice where outside pressure is pushing you to decide",
      "Talk decisions through without committing yet",
    ],
    PhaseName::WaxingGibbous => [
      "Pay attention to who leaves you energised or drained",
      "Refine where you spend your time",
    ],
    PhaseName::FullMoon => [
      "You may feel everyone's energy at once; protect your space",
      "Reflect on what the whole cycle has shown you",
    ],
    PhaseName::WaningGibbous => [
      "Share your reflections with people you trust",
      "Let go of energy that was never yours",
    ],
    PhaseName::LastQuarter => [
      "Release commitments that no longer feel right",
      "Clear your space physically and energetically",
    ],
    PhaseName::WaningCrescent => [
      "Rest deeply before the next cycle begins",
      "Review the month before making big choices",
    ],
  };

  let mut guidance: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
  guidance.push("Track how you feel each day across the full cycle".to_string());
  guidance.push("Your clarity comes from the whole month, not a single day".to_string());
  guidance
}

/// ---------------------------------------------------------------------------
/// Menstrual / Lunar Alignment
/// ---------------------------------------------------------------------------

const CYCLE_LENGTH_DAYS: i64 = 28;

fn is_menstrual(cycle_day: u32) -> bool {
  (1..=5).contains(&cycle_day)
}

fn is_ovulation(cycle_day: u32) -> bool {
  (12..=16).contains(&cycle_day)
}

/// 1-based day in a 28 day cycle, or `None` before the cycle started
pub fn cycle_day_from_start(cycle_start: NaiveDate, today: NaiveDate) -> Option<u32> {
  let elapsed = (today - cycle_start).num_days();
  if elapsed < 0 {
    return None;
  }
  Some((elapsed % CYCLE_LENGTH_DAYS) as u32 + 1)
}

pub fn analyze_feminine_lunar_alignment(cycle_day: u32, lunar_phase: &LunarPhase) -> FeminineLunarAlignment {
  let menstrual = is_menstrual(cycle_day);
  let ovulation = is_ovulation(cycle_day);
  let new_moon = lunar_phase.name == PhaseName::NewMoon;
  let full_moon = lunar_phase.name == PhaseName::FullMoon;

  let (alignment, insight, recommendations): (CycleSync, &str, &[&str]) =
    if (menstrual && new_moon) || (ovulation && full_moon) {
      (
        CycleSync::Synchronized,
        "Your cycle is synchronized with the Moon. Inner and outer rhythms are moving together.",
        &[
          "Lean into the shared energy of this phase",
          "Use this alignment for intention setting or celebration",
          "Notice how your body responds to the lunar rhythm",
        ],
      )
    } else if (menstrual && full_moon) || (ovulation && new_moon) {
      (
        CycleSync::Complementary,
        "Your cycle complements the Moon. You carry the opposite energy to the sky right now.",
        &[
          "Honour your body's rhythm over outside expectations",
          "Balance the Moon's energy with your own",
          "Notice the creative tension between the two cycles",
        ],
      )
    } else {
      (
        CycleSync::Neutral,
        "Your cycle and the Moon are moving independently right now.",
        &[
          "Follow your body's signals first",
          "Keep tracking both cycles to see your own patterns",
        ],
      )
    };

  FeminineLunarAlignment {
    cycle_day,
    alignment,
    insight: insight.to_string(),
    recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
  }
}
