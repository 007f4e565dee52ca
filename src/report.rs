//! Plain-text exports for the "download as text" feature

use chrono::{DateTime, NaiveDate, Utc};

use crate::forecast::weekday_name;
use crate::models::{EnergyForecast, EnergyPattern, LunarInsight};

const MAX_PATTERNS_IN_REPORT: usize = 5;

fn format_days(days: &[NaiveDate]) -> String {
  if days.is_empty() {
    return "none".to_string();
  }
  days
    .iter()
    .map(|d| d.format("%A, %B %-d").to_string())
    .collect::<Vec<_>>()
    .join("; ")
}

fn percent(confidence: f64) -> String {
  format!("{:.0}%", confidence * 100.0)
}

fn pattern_line(p: &EnergyPattern) -> String {
  let mut line = format!(
    "- {} {}: avg {:.1} over {} scans ({} confidence)",
    weekday_name(p.day_of_week),
    p.time_of_day.as_str(),
    p.average_score,
    p.frequency,
    percent(p.confidence)
  );
  if let Some(center) = p.dominant_center {
    line.push_str(&format!(", {} center", center.display_name()));
  }
  line
}

pub fn forecast_report(forecast: &EnergyForecast, generated_at: DateTime<Utc>) -> String {
  let mut lines = vec![
    "ENERGY FORECAST".to_string(),
    format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
    String::new(),
    format!("Expected score: {}/100", forecast.next_week.expected_score),
    format!("Risk days: {}", format_days(&forecast.next_week.risk_days)),
    format!("Opportunity days: {}", format_days(&forecast.next_week.opportunity_days)),
  ];

  if !forecast.patterns.is_empty() {
    lines.push(String::new());
    lines.push("PATTERNS".to_string());
    lines.extend(forecast.patterns.iter().take(MAX_PATTERNS_IN_REPORT).map(pattern_line));
  }

  if !forecast.insights.is_empty() {
    lines.push(String::new());
    lines.push("INSIGHTS".to_string());
    for insight in &forecast.insights {
      lines.push(format!(
        "[{}] {} ({}, {} confidence)",
        insight.insight_type.as_str(),
        insight.prediction,
        insight.timeframe,
        percent(insight.confidence)
      ));
      lines.extend(insight.recommendations.iter().map(|rec| format!("  * {}", rec)));
    }
  }

  lines.join("\n") + "\n"
}

pub fn lunar_report(insight: &LunarInsight) -> String {
  let phase = insight.current_phase;
  let next = insight.next_phase;

  let mut lines = vec![
    format!("LUNAR INSIGHT ({})", insight.date.format("%Y-%m-%d")),
    format!("{} {} - {}", phase.emoji, phase.display_name, phase.description),
    format!("Day {} of this phase", insight.days_in_phase),
    format!(
      "Next: {} {} in {} day(s)",
      next.emoji, next.display_name, insight.days_to_next_phase
    ),
    format!(
      "Alignment: {} (expected energy {})",
      insight.energy_alignment.as_str(),
      insight.expected_energy
    ),
    String::new(),
    insight.personalized_message.clone(),
    String::new(),
    "Recommendations:".to_string(),
  ];
  lines.extend(insight.recommendations.iter().map(|rec| format!("  * {}", rec)));

  lines.join("\n") + "\n"
}
