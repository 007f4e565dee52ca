//! Forecast rules over analyzed energy patterns
//!
//! Turns the bucket statistics from [`crate::patterns`] into dated insights
//! and a seven-day outlook. None of these functions fail: thin history
//! degrades to empty insight lists and a midpoint expected score.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use log::{debug, info};

use crate::models::{
  Center, EnergyForecast, EnergyPattern, InsightType, NextWeekForecast, PredictiveInsight,
  ScanRecord,
};
use crate::patterns::{analyze_energy_patterns, confidence_for};

/// ---------------------------------------------------------------------------
/// Thresholds
/// ---------------------------------------------------------------------------

const DIP_SCORE_THRESHOLD: f64 = 40.0;
const PEAK_SCORE_THRESHOLD: f64 = 75.0;
const INSIGHT_MIN_CONFIDENCE: f64 = 0.3;

const RISK_SCORE_THRESHOLD: f64 = 40.0;
const OPPORTUNITY_SCORE_THRESHOLD: f64 = 70.0;
const DAY_LOOKUP_MIN_CONFIDENCE: f64 = 0.2;

/// Expected score when there is no history at all
pub const DEFAULT_EXPECTED_SCORE: u32 = 50;
const EXPECTED_SCORE_WINDOW: usize = 7;
const FORECAST_DAYS: i64 = 7;

pub const CYCLE_WINDOW_DAYS: i64 = 28;
const CYCLE_MIN_SCANS: usize = 10;
const CYCLE_PERIODS: [usize; 4] = [7, 14, 21, 28];
const CYCLE_CORRELATION_THRESHOLD: f64 = 0.6;
const CYCLE_INSIGHT_CONFIDENCE: f64 = 0.7;

const WEEKDAY_NAMES: [&str; 7] = [
  "Sunday",
  "Monday",
  "Tuesday",
  "Wednesday",
  "Thursday",
  "Friday",
  "Saturday",
];

/// Weekday name for 0 = Sunday .. 6 = Saturday
pub fn weekday_name(day_of_week: u32) -> &'static str {
  WEEKDAY_NAMES[(day_of_week % 7) as usize]
}

/// Next date strictly after `today` falling on `day_of_week`.
/// A match on today itself rolls over to next week.
pub fn next_occurrence(today: NaiveDate, day_of_week: u32) -> NaiveDate {
  let today_dow = today.weekday().num_days_from_sunday();
  let days_until = match (day_of_week % 7 + 7 - today_dow) % 7 {
    0 => 7,
    d => d,
  };
  today + Duration::days(days_until as i64)
}

fn format_day(date: NaiveDate) -> String {
  date.format("%A, %B %-d").to_string()
}

/// ---------------------------------------------------------------------------
/// Pattern Rules
/// ---------------------------------------------------------------------------

/// Run the dip, peak and center rules over patterns sorted by confidence
pub fn generate_predictions(patterns: &[EnergyPattern], now: DateTime<Utc>) -> Vec<PredictiveInsight> {
  let today = now.date_naive();
  let mut insights = Vec::new();

  if let Some(dip) = patterns
    .iter()
    .find(|p| p.average_score < DIP_SCORE_THRESHOLD && p.confidence > INSIGHT_MIN_CONFIDENCE)
  {
    insights.push(energy_dip_insight(dip, today));
  }

  if let Some(peak) = patterns
    .iter()
    .find(|p| p.average_score > PEAK_SCORE_THRESHOLD && p.confidence > INSIGHT_MIN_CONFIDENCE)
  {
    insights.push(energy_peak_insight(peak, today));
  }

  if let Some(center) = center_activation_insight(patterns) {
    insights.push(center);
  }

  debug!("Generated {} insights from {} patterns", insights.len(), patterns.len());
  insights
}

fn energy_dip_insight(pattern: &EnergyPattern, today: NaiveDate) -> PredictiveInsight {
  let date = next_occurrence(today, pattern.day_of_week);
  PredictiveInsight {
    insight_type: InsightType::EnergyDip,
    prediction: format!(
      "Your energy tends to dip on {} {}s (average {:.0}/100)",
      weekday_name(pattern.day_of_week),
      pattern.time_of_day.as_str(),
      pattern.average_score
    ),
    confidence: pattern.confidence,
    timeframe: format_day(date),
    recommendations: vec![
      format!(
        "Keep the {} light and leave space to rest",
        pattern.time_of_day.as_str()
      ),
      "Try a grounding practice before the dip begins".to_string(),
      "Protect your boundaries and avoid overcommitting".to_string(),
    ],
  }
}

fn energy_peak_insight(pattern: &EnergyPattern, today: NaiveDate) -> PredictiveInsight {
  let date = next_occurrence(today, pattern.day_of_week);
  PredictiveInsight {
    insight_type: InsightType::EnergyPeak,
    prediction: format!(
      "Your energy tends to peak on {} {}s (average {:.0}/100)",
      weekday_name(pattern.day_of_week),
      pattern.time_of_day.as_str(),
      pattern.average_score
    ),
    confidence: pattern.confidence,
    timeframe: format_day(date),
    recommendations: vec![
      format!(
        "Plan important conversations or creative work for the {}",
        pattern.time_of_day.as_str()
      ),
      "Start new initiatives while your energy is high".to_string(),
      "Share your energy, but leave room to recharge".to_string(),
    ],
  }
}

fn center_activation_insight(patterns: &[EnergyPattern]) -> Option<PredictiveInsight> {
  // First-seen order breaks confidence ties
  let mut totals: Vec<(Center, u32)> = Vec::new();
  for pattern in patterns {
    let Some(center) = pattern.dominant_center else {
      continue;
    };
    match totals.iter_mut().find(|(c, _)| *c == center) {
      Some((_, total)) => *total += pattern.frequency,
      None => totals.push((center, pattern.frequency)),
    }
  }

  let mut candidates: Vec<(Center, f64)> = totals
    .into_iter()
    .map(|(center, total)| (center, confidence_for(total)))
    .filter(|(_, confidence)| *confidence > INSIGHT_MIN_CONFIDENCE)
    .collect();
  candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

  let (center, confidence) = candidates.into_iter().next()?;
  Some(PredictiveInsight {
    insight_type: InsightType::CenterActivation,
    prediction: format!(
      "Your {} center has been consistently active in your scans",
      center.display_name()
    ),
    confidence,
    timeframe: "Ongoing".to_string(),
    recommendations: center_recommendations(center),
  })
}

/// Canned guidance per center; centers without an entry get one generic line
pub fn center_recommendations(center: Center) -> Vec<String> {
  let lines: &[&str] = match center {
    Center::Throat => &[
      "Speak your truth, but wait for the right timing",
      "Journal or voice-note what wants to be expressed",
      "Notice when you talk to be seen rather than to share",
    ],
    Center::Sacral => &[
      "Follow your gut responses to what life brings you",
      "Spend energy on work that genuinely lights you up",
      "Stop before exhaustion and let your body reset",
    ],
    Center::SolarPlexus => &[
      "Wait out the emotional wave before deciding",
      "Give yourself time to find clarity",
      "Name your feelings without acting on them straight away",
    ],
    Center::Heart => &[
      "Honour your promises, and make fewer of them",
      "Rest your willpower; you don't have to prove anything",
      "Notice where you are pushing for recognition",
    ],
    Center::G => &[
      "Revisit your direction and what feels like you",
      "Spend time in places that feel right to you",
      "Let love and identity questions breathe",
    ],
    Center::Root => &[
      "Channel pressure into one focused task at a time",
      "Move your body to release adrenal stress",
      "Notice urgency that isn't really yours",
    ],
    Center::Spleen => &[
      "Trust your in-the-moment intuition",
      "Look after your immune system with sleep and nourishment",
      "Let go of what no longer feels healthy",
    ],
    other => {
      return vec![format!(
        "Notice how your {} center is expressing itself today",
        other.display_name()
      )]
    }
  };
  lines.iter().map(|s| s.to_string()).collect()
}

/// ---------------------------------------------------------------------------
/// Cycle Detection
/// ---------------------------------------------------------------------------

/// Mean similarity of scores `period` positions apart, in [0, 1].
/// Returns 0 when there is no pair to compare.
pub fn calculate_cyclic_correlation(scores: &[f64], period: usize) -> f64 {
  if period == 0 || scores.len() <= period {
    return 0.0;
  }

  let pairs = scores.len() - period;
  let total: f64 = (0..pairs)
    .map(|i| (100.0 - (scores[i] - scores[i + period]).abs()) / 100.0)
    .sum();
  total / pairs as f64
}

/// Look for a repeating rhythm in the last 28 days of scans
pub fn analyze_feminine_cycle(history: &[ScanRecord], now: DateTime<Utc>) -> Option<PredictiveInsight> {
  let window_start = now - Duration::days(CYCLE_WINDOW_DAYS);
  let scores: Vec<f64> = history
    .iter()
    .filter(|s| s.date >= window_start)
    .map(|s| s.score)
    .collect();

  if scores.len() < CYCLE_MIN_SCANS {
    debug!(
      "Skipping cycle analysis: {} recent scans (need {})",
      scores.len(),
      CYCLE_MIN_SCANS
    );
    return None;
  }

  let (period, correlation) = CYCLE_PERIODS
    .iter()
    .map(|&period| (period, calculate_cyclic_correlation(&scores, period)))
    .filter(|(_, correlation)| *correlation > CYCLE_CORRELATION_THRESHOLD)
    .fold(None, |best: Option<(usize, f64)>, candidate| match best {
      Some(b) if b.1 >= candidate.1 => Some(b),
      _ => Some(candidate),
    })?;

  info!("Detected {}-day energy rhythm (correlation {:.2})", period, correlation);
  Some(PredictiveInsight {
    insight_type: InsightType::CyclePattern,
    prediction: format!(
      "Your energy follows a repeating {}-day rhythm ({:.0}% consistency)",
      period,
      correlation * 100.0
    ),
    confidence: CYCLE_INSIGHT_CONFIDENCE,
    timeframe: format!("Next {} days", CYCLE_WINDOW_DAYS),
    recommendations: vec![
      "Note where you are in your cycle alongside each scan".to_string(),
      "Plan demanding work for the high-energy part of your rhythm".to_string(),
      "Honour rest during the lower-energy days".to_string(),
    ],
  })
}

/// ---------------------------------------------------------------------------
/// Weekly Forecast
/// ---------------------------------------------------------------------------

/// Rounded mean of the most recent scores, or the midpoint with no history
pub fn expected_score(history: &[ScanRecord]) -> u32 {
  let recent: Vec<f64> = history
    .iter()
    .take(EXPECTED_SCORE_WINDOW)
    .map(|s| s.score)
    .collect();

  if recent.is_empty() {
    return DEFAULT_EXPECTED_SCORE;
  }

  let mean = recent.iter().sum::<f64>() / recent.len() as f64;
  mean.round().max(0.0) as u32
}

/// Classify the seven days after `today` as risk or opportunity days.
/// Days with no confident pattern, or a middling one, land in neither list.
pub fn classify_upcoming_days(
  patterns: &[EnergyPattern],
  today: NaiveDate,
) -> (Vec<NaiveDate>, Vec<NaiveDate>) {
  let mut risk_days = Vec::new();
  let mut opportunity_days = Vec::new();

  for offset in 1..=FORECAST_DAYS {
    let date = today + Duration::days(offset);
    let dow = date.weekday().num_days_from_sunday();

    let Some(pattern) = patterns
      .iter()
      .find(|p| p.day_of_week == dow && p.confidence > DAY_LOOKUP_MIN_CONFIDENCE)
    else {
      continue;
    };

    if pattern.average_score < RISK_SCORE_THRESHOLD {
      risk_days.push(date);
    } else if pattern.average_score > OPPORTUNITY_SCORE_THRESHOLD {
      opportunity_days.push(date);
    }
  }

  (risk_days, opportunity_days)
}

/// Full seven-day forecast from most-recent-first scan history
pub fn generate_weekly_forecast(history: &[ScanRecord], now: DateTime<Utc>) -> EnergyForecast {
  let patterns = analyze_energy_patterns(history);
  let insights = generate_predictions(&patterns, now);
  let (risk_days, opportunity_days) = classify_upcoming_days(&patterns, now.date_naive());

  EnergyForecast {
    next_week: NextWeekForecast {
      expected_score: expected_score(history),
      risk_days,
      opportunity_days,
    },
    patterns,
    insights,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::models::TimeOfDay;
  use crate::test_utils::{mock_pattern, mock_scan, mock_scan_with_center, utc};

  /// Monday-morning lows (Throat) and Friday-evening highs (Root)
  fn split_week_history() -> Vec<ScanRecord> {
    let mut scans = Vec::new();
    for week in 0..5 {
      scans.push(mock_scan_with_center(2024, 1, 8 + 7 * week, 8, 30.0, Some(Center::Throat)));
    }
    for week in 0..4 {
      scans.push(mock_scan_with_center(2024, 1, 12 + 7 * week, 19, 85.0, Some(Center::Root)));
    }
    scans
  }

  #[test]
  fn test_next_occurrence_skips_today() {
    // 2024-02-12 is a Monday
    let monday = NaiveDate::from_ymd_opt(2024, 2, 12).unwrap();
    assert_eq!(next_occurrence(monday, 1), NaiveDate::from_ymd_opt(2024, 2, 19).unwrap());
    assert_eq!(next_occurrence(monday, 2), NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
    assert_eq!(next_occurrence(monday, 0), NaiveDate::from_ymd_opt(2024, 2, 18).unwrap());
  }

  #[test]
  fn test_predictions_dip_peak_and_center() {
    let patterns = analyze_energy_patterns(&split_week_history());
    // Wednesday
    let now = utc(2024, 2, 14, 10);

    let insights = generate_predictions(&patterns, now);
    assert_eq!(insights.len(), 3);

    let dip = &insights[0];
    assert_eq!(dip.insight_type, InsightType::EnergyDip);
    assert_eq!(dip.timeframe, "Monday, February 19");
    assert_approx_eq!(dip.confidence, 0.5, 1e-9);
    assert_eq!(dip.recommendations.len(), 3);
    assert!(dip.prediction.contains("Monday mornings"));

    let peak = &insights[1];
    assert_eq!(peak.insight_type, InsightType::EnergyPeak);
    assert_eq!(peak.timeframe, "Friday, February 16");
    assert_approx_eq!(peak.confidence, 0.4, 1e-9);

    let center = &insights[2];
    assert_eq!(center.insight_type, InsightType::CenterActivation);
    assert!(center.prediction.contains("Throat"));
    assert_eq!(center.recommendations.len(), 3);
  }

  #[test]
  fn test_dip_on_matching_weekday_rolls_to_next_week() {
    let patterns = analyze_energy_patterns(&split_week_history());
    // Monday itself
    let insights = generate_predictions(&patterns, utc(2024, 2, 12, 7));
    let dip = insights
      .iter()
      .find(|i| i.insight_type == InsightType::EnergyDip)
      .unwrap();
    assert_eq!(dip.timeframe, "Monday, February 19");
  }

  #[test]
  fn test_low_confidence_patterns_produce_no_insights() {
    let patterns = vec![
      mock_pattern(TimeOfDay::Morning, 1, 20.0, 3),
      mock_pattern(TimeOfDay::Evening, 5, 95.0, 2),
    ];
    assert!(generate_predictions(&patterns, utc(2024, 2, 14, 10)).is_empty());
  }

  #[test]
  fn test_center_fallback_for_unlisted_center() {
    let recs = center_recommendations(Center::Ajna);
    assert_eq!(recs.len(), 1);
    assert!(recs[0].contains("Ajna"));
    assert_eq!(center_recommendations(Center::Sacral).len(), 3);
  }

  #[test]
  fn test_center_activation_sums_across_patterns() {
    let mut a = mock_pattern(TimeOfDay::Morning, 1, 55.0, 2);
    a.dominant_center = Some(Center::Spleen);
    let mut b = mock_pattern(TimeOfDay::Evening, 3, 60.0, 2);
    b.dominant_center = Some(Center::Spleen);
    let mut c = mock_pattern(TimeOfDay::Afternoon, 4, 50.0, 3);
    c.dominant_center = Some(Center::Head);

    let insights = generate_predictions(&[c, a, b], utc(2024, 2, 14, 10));
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].insight_type, InsightType::CenterActivation);
    assert!(insights[0].prediction.contains("Spleen"));
    assert_approx_eq!(insights[0].confidence, 0.4, 1e-9);
  }

  #[test]
  fn test_cyclic_correlation() {
    assert_eq!(calculate_cyclic_correlation(&[50.0; 5], 7), 0.0);
    assert_approx_eq!(calculate_cyclic_correlation(&[50.0; 10], 7), 1.0, 1e-9);

    // Pairs: (10, 60) and (20, 20)
    let scores = [10.0, 20.0, 60.0, 20.0];
    assert_approx_eq!(calculate_cyclic_correlation(&scores, 2), (0.5 + 1.0) / 2.0, 1e-9);
  }

  #[test]
  fn test_cycle_insight_requires_ten_recent_scans() {
    let now = utc(2024, 3, 1, 12);
    let steady: Vec<_> = (0..12)
      .map(|i| ScanRecord {
        date: now - Duration::days(i),
        score: 70.0,
        center: None,
      })
      .collect();

    let insight = analyze_feminine_cycle(&steady, now).unwrap();
    assert_eq!(insight.insight_type, InsightType::CyclePattern);
    assert_approx_eq!(insight.confidence, 0.7, 1e-9);
    assert!(insight.prediction.contains("7-day"));

    assert!(analyze_feminine_cycle(&steady[..9], now).is_none());
  }

  #[test]
  fn test_cycle_ignores_scans_outside_window() {
    let now = utc(2024, 3, 1, 12);
    let scans: Vec<_> = (0..12)
      .map(|i| ScanRecord {
        date: now - Duration::days(if i < 7 { i } else { 30 + i }),
        score: 70.0,
        center: None,
      })
      .collect();
    assert!(analyze_feminine_cycle(&scans, now).is_none());
  }

  #[test]
  fn test_cycle_not_reported_when_weeks_disagree() {
    let now = utc(2024, 3, 1, 12);
    // This week at 0, last week at 100
    let scans: Vec<_> = (0..14)
      .map(|i| ScanRecord {
        date: now - Duration::days(i),
        score: if i < 7 { 0.0 } else { 100.0 },
        center: None,
      })
      .collect();

    let scores: Vec<f64> = scans.iter().map(|s| s.score).collect();
    assert_approx_eq!(calculate_cyclic_correlation(&scores, 7), 0.0, 1e-9);
    assert!(analyze_feminine_cycle(&scans, now).is_none());
  }

  #[test]
  fn test_weekly_forecast_empty_history_defaults() {
    let forecast = generate_weekly_forecast(&[], utc(2024, 2, 14, 10));
    assert_eq!(forecast.next_week.expected_score, 50);
    assert!(forecast.next_week.risk_days.is_empty());
    assert!(forecast.next_week.opportunity_days.is_empty());
    assert!(forecast.patterns.is_empty());
    assert!(forecast.insights.is_empty());
  }

  #[test]
  fn test_expected_score_uses_seven_most_recent() {
    let mut scans: Vec<_> = (0..7).map(|i| mock_scan(2024, 2, 20 - i, 9, 61.0)).collect();
    scans.push(mock_scan(2024, 2, 1, 9, 0.0));
    assert_eq!(expected_score(&scans), 61);

    let rounding = vec![mock_scan(2024, 2, 2, 9, 60.0), mock_scan(2024, 2, 1, 9, 61.0)];
    assert_eq!(expected_score(&rounding), 61);
  }

  #[test]
  fn test_risk_and_opportunity_partition() {
    let patterns = vec![
      mock_pattern(TimeOfDay::Morning, 1, 30.0, 5),
      mock_pattern(TimeOfDay::Evening, 5, 80.0, 5),
    ];

    // Wednesday
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let (risk, opportunity) = classify_upcoming_days(&patterns, today);
    assert_eq!(risk, vec![NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()]);
    assert_eq!(opportunity, vec![NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()]);
    assert!(risk.iter().all(|d| !opportunity.contains(d)));

    // From a Monday, the Monday listed is the following week's
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let (risk, _) = classify_upcoming_days(&patterns, monday);
    assert_eq!(risk, vec![NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()]);
  }

  #[test]
  fn test_middling_or_unconfident_days_unclassified() {
    let patterns = vec![
      mock_pattern(TimeOfDay::Morning, 2, 55.0, 8),
      mock_pattern(TimeOfDay::Morning, 3, 10.0, 2),
    ];
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let (risk, opportunity) = classify_upcoming_days(&patterns, today);
    assert!(risk.is_empty());
    assert!(opportunity.is_empty());
  }

  #[test]
  fn test_thresholds_are_exclusive() {
    let patterns = vec![
      mock_pattern(TimeOfDay::Morning, 1, 40.0, 5),
      mock_pattern(TimeOfDay::Evening, 5, 75.0, 5),
      mock_pattern(TimeOfDay::Afternoon, 3, 70.0, 5),
    ];
    assert!(generate_predictions(&patterns, utc(2024, 1, 10, 10)).is_empty());

    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let (risk, opportunity) = classify_upcoming_days(&patterns[..1], today);
    assert!(risk.is_empty());
    assert!(opportunity.is_empty());

    // 75 clears the opportunity bar but not the peak bar
    let (_, opportunity) = classify_upcoming_days(&patterns[1..], today);
    assert_eq!(opportunity, vec![NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()]);

    let (_, opportunity) = classify_upcoming_days(&patterns[2..], today);
    assert!(opportunity.is_empty());

    // Just past each bar
    let crossing = vec![
      mock_pattern(TimeOfDay::Morning, 1, 39.9, 5),
      mock_pattern(TimeOfDay::Evening, 5, 75.1, 5),
    ];
    let insights = generate_predictions(&crossing, utc(2024, 1, 10, 10));
    assert_eq!(insights.len(), 2);
    assert_eq!(insights[0].insight_type, InsightType::EnergyDip);
    assert_eq!(insights[1].insight_type, InsightType::EnergyPeak);
  }

  #[test]
  fn test_weekly_forecast_end_to_end() {
    let mut history = split_week_history();
    history.reverse();
    let forecast = generate_weekly_forecast(&history, utc(2024, 2, 14, 10));

    assert_eq!(forecast.patterns.len(), 2);
    assert_eq!(
      forecast.next_week.risk_days,
      vec![NaiveDate::from_ymd_opt(2024, 2, 19).unwrap()]
    );
    assert_eq!(
      forecast.next_week.opportunity_days,
      vec![NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()]
    );
    assert_eq!(forecast.insights.len(), 3);
  }
}
