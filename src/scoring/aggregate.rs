// Score aggregation
// Sums the components into a 0-100 raw total and rescales it to the 1-9 grade.

use crate::constants::{DISPLAY_SCORE_MAX, DISPLAY_SCORE_MIN, RAW_TOTAL_MAX};
use super::ScoreComponent;

/// Combine the three components. Returns (raw_total, display_score).
pub fn aggregate(
    length: &ScoreComponent,
    grammar: &ScoreComponent,
    complexity: &ScoreComponent,
) -> (f64, u8) {
    let sum = length.value() + grammar.value() + complexity.value();
    // Component maxima sum to 100
    let raw_total = sum.clamp(0.0, RAW_TOTAL_MAX);

    (raw_total, display_score(raw_total))
}

/// Map a raw total in [0, 100] onto the 1-9 display grade.
/// Exact halves round to the even neighbour (31.25 -> 2.5 -> 2 -> grade 3).
pub fn display_score(raw_total: f64) -> u8 {
    let raw_total = if raw_total.is_nan() { 0.0 } else { raw_total.clamp(0.0, RAW_TOTAL_MAX) };
    let steps = f64::from(DISPLAY_SCORE_MAX - DISPLAY_SCORE_MIN);
    let scaled = ((raw_total / RAW_TOTAL_MAX) * steps).round_ties_even();

    (scaled as u8 + DISPLAY_SCORE_MIN).clamp(DISPLAY_SCORE_MIN, DISPLAY_SCORE_MAX)
}
