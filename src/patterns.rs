//! Energy pattern analysis
//!
//! Buckets scan history by (time of day, weekday) and keeps a running mean
//! per bucket. Everything downstream (forecast rules, risk days) reads these
//! buckets, so the maths here stays simple and deterministic.

use log::debug;

use crate::models::{EnergyPattern, ScanRecord};

/// Below this many scans no patterns are reported at all
pub const MIN_HISTORY_FOR_PATTERNS: usize = 5;

/// Scans needed in a bucket before its confidence saturates at 1.0
const FULL_CONFIDENCE_SAMPLES: f64 = 10.0;

/// Sample-size trust for a bucket: min(frequency / 10, 1)
pub fn confidence_for(frequency: u32) -> f64 {
  (frequency as f64 / FULL_CONFIDENCE_SAMPLES).min(1.0)
}

/// Fold scan history into per-bucket statistics, sorted by confidence (desc).
///
/// Buckets keep first-seen order among equal confidences, so for
/// most-recent-first history the most recently active bucket wins ties.
pub fn analyze_energy_patterns(history: &[ScanRecord]) -> Vec<EnergyPattern> {
  if history.len() < MIN_HISTORY_FOR_PATTERNS {
    debug!(
      "Skipping pattern analysis: {} scans (need {})",
      history.len(),
      MIN_HISTORY_FOR_PATTERNS
    );
    return Vec::new();
  }

  // At most 21 buckets, a linear scan is fine
  let mut buckets: Vec<EnergyPattern> = Vec::new();

  for scan in history {
    let time_of_day = scan.time_of_day();
    let day_of_week = scan.day_of_week();

    match buckets
      .iter_mut()
      .find(|p| p.time_of_day == time_of_day && p.day_of_week == day_of_week)
    {
      Some(pattern) => {
        let freq = pattern.frequency as f64;
        pattern.average_score = (pattern.average_score * freq + scan.score) / (freq + 1.0);
        pattern.frequency += 1;
        pattern.dominant_center = scan.center;
      }
      None => buckets.push(EnergyPattern {
        time_of_day,
        day_of_week,
        average_score: scan.score,
        dominant_center: scan.center,
        frequency: 1,
        confidence: 0.0,
      }),
    }
  }

  for pattern in &mut buckets {
    pattern.confidence = confidence_for(pattern.frequency);
  }

  // Stable sort keeps insertion order for ties
  buckets.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

  debug!("Analyzed {} scans into {} patterns", history.len(), buckets.len());
  buckets
}
